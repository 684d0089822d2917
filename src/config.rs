// Command line and environment configuration.

use crate::store::FileStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Parser, Debug)]
#[command(name = "referral")]
#[command(author, version, about = "Phone login and referral codes from the terminal")]
pub struct Cli {
    /// Base URL of the referral backend
    #[arg(long, env = "REFERRAL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File holding the stored session (default: ~/.referral_session.json)
    #[arg(long, env = "REFERRAL_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Seconds to wait before opening the main screen after verification
    #[arg(long, env = "REFERRAL_REDIRECT_DELAY", default_value_t = 3)]
    pub redirect_delay: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "REFERRAL_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive login flow (default)
    Run,
    /// Print the stored session state
    Status,
    /// Forget the stored session
    Logout,
}

/// Resolved settings used by the client and the router.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub redirect_delay: u64,
    /// Time between countdown ticks.
    pub tick: Duration,
    pub timeout: Duration,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            api_url: cli.api_url.clone(),
            session_file: cli.session_file.clone().unwrap_or_else(FileStore::default_path),
            redirect_delay: cli.redirect_delay,
            tick: Duration::from_secs(1),
            timeout: Duration::from_secs(cli.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::try_parse_from(["referral"]).unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.redirect_delay, 3);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(cli.command.is_none());
    }

    #[test]
    fn flags_and_subcommand() {
        let cli = Cli::try_parse_from([
            "referral",
            "--api-url",
            "https://example.test",
            "--session-file",
            "/tmp/s.json",
            "--redirect-delay",
            "0",
            "status",
        ])
        .unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.api_url, "https://example.test");
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.redirect_delay, 0);
        assert_eq!(cli.command, Some(Command::Status));
    }
}
