//! Command implementations. Results go to stdout as pretty JSON.

use std::io::BufRead;
use std::time::Duration;

use rdpanel_api_client::{ApiError, AppContext, LoginOutcome};
use rdpanel_core::config::ClientConfig;
use rdpanel_core::models::logs::{LogLevel, LogQuery, LogSource};
use serde::Serialize;
use serde_json::json;

use crate::cli::{Commands, FilesCommand, RdpCommand, SessionsCommand, TwoFactorCommand};
use crate::{Error, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_version() {
    println!("rdpanel {}", env!("CARGO_PKG_VERSION"));
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(Error::Custom(
            "No password given, pass --password or pipe it on stdin".into(),
        ));
    }
    Ok(password)
}

pub async fn execute(ctx: &AppContext, config: &ClientConfig, command: Commands) -> Result<()> {
    let client = ctx.client();

    match command {
        Commands::Version => {
            print_version();
            Ok(())
        }

        Commands::Status => {
            let session = ctx.sessions().current();
            print_json(&json!({
                "api_url": config.api_url.as_str(),
                "state_file": config.session_file(),
                "authenticated": session.is_some(),
                "user": session.as_ref().map(|s| &s.user.username),
                "role": session.as_ref().map(|s| s.user.role.as_str()),
            }))
        }

        Commands::Login {
            username,
            password,
            code,
        } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            match client.login(&username, &password, code.as_deref()).await {
                LoginOutcome::Authenticated(session) => print_json(&session.user),
                LoginOutcome::SecondFactorRequired => Err(Error::SecondFactorRequired),
                LoginOutcome::Rejected(rejection) => Err(Error::LoginRejected(rejection.message)),
            }
        }

        Commands::Logout => {
            client.logout();
            Ok(())
        }

        Commands::Whoami => {
            let user = client.me().await?;
            print_json(&user)
        }

        Commands::Dashboard => print_json(&client.dashboard().stats().await?),

        Commands::Watch { interval, count } => watch(ctx, interval, count).await,

        Commands::Files(cmd) => files(ctx, cmd).await,

        Commands::Rdp(cmd) => match cmd {
            RdpCommand::Ls => print_json(&client.rdp().list().await?),
            RdpCommand::Active => print_json(&client.rdp().active_connections().await?),
            RdpCommand::Keys { id, keys } => print_json(&client.rdp().send_keys(&id, &keys).await?),
            RdpCommand::Close { id } => print_json(&client.rdp().terminate(&id).await?),
        },

        Commands::Sessions(cmd) => {
            let sessions = client.remote_sessions();
            match cmd {
                SessionsCommand::Ls => print_json(&sessions.active().await?),
                SessionsCommand::History { limit, days } => {
                    print_json(&sessions.history(limit, days).await?)
                }
                SessionsCommand::Kill { id } => print_json(&sessions.terminate(&id).await?),
            }
        }

        Commands::Logs {
            level,
            source,
            limit,
            search,
        } => logs(ctx, level, source, limit, search).await,

        Commands::Settings => print_json(&client.settings().get().await?),

        Commands::TwoFactor(cmd) => match cmd {
            TwoFactorCommand::Setup => print_json(&client.setup_two_factor().await?),
            TwoFactorCommand::Enable { code } => {
                print_json(&client.enable_two_factor(&code).await?)
            }
            TwoFactorCommand::Disable { password } => {
                print_json(&client.disable_two_factor(&password).await?)
            }
        },

        Commands::Passwd { current, new } => {
            print_json(&client.change_password(&current, &new).await?)
        }
    }
}

async fn files(ctx: &AppContext, cmd: FilesCommand) -> Result<()> {
    let files = ctx.client().files();
    match cmd {
        FilesCommand::Ls { path } => print_json(&files.list(&path).await?),
        FilesCommand::Get { remote, local } => {
            let bytes = files.download_file(&remote, &local).await?;
            print_json(&json!({ "remote": remote, "local": local, "bytes": bytes }))
        }
        FilesCommand::Put { local, dir, plain } => {
            print_json(&files.upload_path(&local, &dir, !plain).await?)
        }
        FilesCommand::Rm { path } => print_json(&files.delete(&path).await?),
    }
}

async fn logs(
    ctx: &AppContext,
    level: Option<LogLevel>,
    source: Option<LogSource>,
    limit: u32,
    search: Option<String>,
) -> Result<()> {
    let query = LogQuery {
        level,
        source,
        search_term: search,
        limit,
        ..LogQuery::default()
    };
    print_json(&ctx.client().logs().list(&query).await?)
}

/// Print dashboard stats on every refresh until `count` updates, Ctrl-C, or
/// the session goes away.
async fn watch(ctx: &AppContext, interval: u64, count: Option<u32>) -> Result<()> {
    if !ctx.sessions().is_authenticated() {
        return Err(ApiError::NotAuthenticated.into());
    }

    let period = Duration::from_secs(interval.max(1));
    let client = ctx.client().clone();
    let mut handle = ctx.poll("dashboard", period, move || {
        let client = client.clone();
        async move { client.dashboard().stats().await }
    });

    let mut seen = 0u32;
    let outcome: Result<()> = loop {
        tokio::select! {
            stats = handle.changed() => match stats {
                Some(stats) => {
                    print_json(&stats)?;
                    seen += 1;
                    if count.is_some_and(|c| seen >= c) {
                        break Ok(());
                    }
                }
                None => break Ok(()),
            },
            _ = tokio::signal::ctrl_c() => break Ok(()),
            _ = tokio::time::sleep(period * 2) => {
                if !ctx.sessions().is_authenticated() {
                    break Err(ApiError::NotAuthenticated.into());
                }
            }
        }
    };

    handle.shutdown().await;
    outcome
}
