// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands};
use rdpanel_api_client::{ApiError, AppContext};
use rdpanel_core::config::{ClientConfig, parse_api_url};

mod cli;
mod commands;
mod frontend;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    if let Commands::Version = args.command {
        commands::print_version();
        return Ok(());
    }

    let config = build_config(&args)?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(serve(config, args.command))
}

async fn serve(config: ClientConfig, command: Commands) -> Result<()> {
    let ctx = AppContext::start(
        &config,
        Arc::new(frontend::TerminalNavigator),
        Arc::new(frontend::TerminalNotifier),
    )?;
    let result = commands::execute(&ctx, &config, command).await;
    ctx.shutdown();
    result
}

/// Environment defaults, overridden by explicit flags.
fn build_config(args: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().map_err(ApiError::from)?;
    if let Some(url) = &args.api_url {
        config.api_url = parse_api_url(url).map_err(ApiError::from)?;
    }
    if let Some(dir) = &args.state_dir {
        config.state_dir = dir.clone();
    }
    if let Some(secs) = args.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }
    Ok(config)
}
