use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rdpanel_core::models::logs::{LogLevel, LogSource};

#[derive(Parser, Debug)]
#[command(name = "rdpanel", about = "Command-line client for the rdpanel backend")]
pub struct Cli {
    /// Backend base URL, including the `/api` prefix.
    #[arg(long, env = "RDPANEL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the persisted session.
    #[arg(long, env = "RDPANEL_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, env = "RDPANEL_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information.
    Version,

    /// Show the local session state without contacting the backend.
    Status,

    /// Log in and persist the session.
    Login {
        username: String,

        /// Read from stdin when omitted.
        #[arg(long, env = "RDPANEL_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// One-time code from the authenticator app.
        #[arg(long)]
        code: Option<String>,
    },

    /// Clear the local session.
    Logout,

    /// Fetch the current user's profile.
    Whoami,

    /// Dashboard headline numbers.
    Dashboard,

    /// Poll the dashboard until interrupted.
    Watch {
        /// Seconds between refreshes.
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// Stop after this many updates.
        #[arg(long)]
        count: Option<u32>,
    },

    /// Remote file manager.
    #[command(subcommand)]
    Files(FilesCommand),

    /// Remote desktop connections.
    #[command(subcommand)]
    Rdp(RdpCommand),

    /// Observed remote sessions.
    #[command(subcommand)]
    Sessions(SessionsCommand),

    /// Audit and system logs.
    Logs {
        #[arg(long)]
        level: Option<LogLevel>,

        #[arg(long)]
        source: Option<LogSource>,

        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Case-insensitive text filter.
        #[arg(long)]
        search: Option<String>,
    },

    /// Application settings.
    Settings,

    /// Two-factor authentication management.
    #[command(subcommand)]
    TwoFactor(TwoFactorCommand),

    /// Change the password.
    Passwd {
        #[arg(long, env = "RDPANEL_PASSWORD", hide_env_values = true)]
        current: String,

        #[arg(long, env = "RDPANEL_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    /// List a remote directory.
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Download a remote file.
    Get { remote: String, local: PathBuf },

    /// Upload a local file into a remote directory.
    Put {
        local: PathBuf,

        #[arg(default_value = "/")]
        dir: String,

        /// Store the file unencrypted.
        #[arg(long)]
        plain: bool,
    },

    /// Delete a remote file or directory.
    Rm { path: String },
}

#[derive(Subcommand, Debug)]
pub enum RdpCommand {
    /// List connections.
    Ls,

    /// Live figures for connected sessions.
    Active,

    /// Send a key combination such as ctrl+alt+del.
    Keys { id: String, keys: String },

    /// Terminate a connection.
    Close { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SessionsCommand {
    /// Active sessions.
    Ls,

    /// Session history.
    History {
        #[arg(long, default_value_t = 100)]
        limit: u32,

        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Terminate a session.
    Kill { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TwoFactorCommand {
    /// Generate a secret and QR code.
    Setup,

    /// Confirm enrolment with a code.
    Enable { code: String },

    /// Turn the second factor off.
    Disable {
        #[arg(long, env = "RDPANEL_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_log_filters() {
        let cli = Cli::try_parse_from([
            "rdpanel", "logs", "--level", "warning", "--source", "auth-service", "--limit", "20",
        ])
        .unwrap();
        let Commands::Logs {
            level,
            source,
            limit,
            ..
        } = cli.command
        else {
            panic!("expected logs command");
        };
        assert_eq!(level, Some(LogLevel::Warning));
        assert_eq!(source, Some(LogSource::AuthService));
        assert_eq!(limit, 20);
    }

    #[test]
    fn two_factor_uses_kebab_name() {
        let cli = Cli::try_parse_from(["rdpanel", "two-factor", "enable", "123456"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::TwoFactor(TwoFactorCommand::Enable { ref code }) if code == "123456"
        ));
    }
}
