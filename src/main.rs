// Entrypoint for the CLI application.
// - Keeps `main` small: parse the configuration, build the API client and
//   the session, then hand them to the router.
// - Returns `anyhow::Result` so every failure is reported with context.

use anyhow::{Context, Result};
use clap::Parser;
use referral_cli::api::ApiClient;
use referral_cli::app::{App, Redirect};
use referral_cli::config::{Cli, Command, Config};
use referral_cli::screens::Screen;
use referral_cli::session::{Session, SessionState};
use referral_cli::store::FileStore;
use referral_cli::ui::Terminal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = Config::from_cli(&cli);
    let mut session = Session::new(FileStore::new(&config.session_file));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let api = ApiClient::new(&config).context("Failed to build HTTP client")?;
            tracing::debug!(api_url = api.base_url(), "starting");
            let redirect = Redirect {
                seconds: config.redirect_delay,
                tick: config.tick,
            };
            let mut app = App::new(api, session, Terminal::new(), redirect);
            // This call blocks until the user exits.
            app.run(Screen::Login)?;
        }
        Command::Status => {
            let state = session.state().context("Reading stored session")?;
            match &state {
                SessionState::PendingVerification { phone, .. } => {
                    println!("{} for {}", state.name(), phone)
                }
                _ => println!("{}", state.name()),
            }
        }
        Command::Logout => {
            session.sign_out().context("Clearing stored session")?;
            println!("Logged out.");
        }
    }
    Ok(())
}

/// Diagnostics go to stderr so they do not mix with the prompts.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("REFERRAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
