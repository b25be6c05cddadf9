use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use wellrs::client::OuraClient;
use wellrs::config::AppConfig;
use wellrs::display::render_dashboard;
use wellrs::error::WellRsError;
use wellrs::logging::{self, LogLevel};
use wellrs::risk::RiskCalculator;
use wellrs::token::{Credential, TokenStore};

/// WellRS - Wellness Crash Risk Dashboard
///
/// Fetches the trailing days of sleep, activity, and stress data from the
/// Oura API and derives a composite 0-100 crash risk score.
#[derive(Parser)]
#[command(name = "wellrs")]
#[command(version = "0.1.0")]
#[command(about = "Wellness Crash Risk Dashboard", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the personal access token
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Fetch the latest data and render the dashboard
    Dashboard {
        /// Dump the fetched windows as JSON instead of rendering
        #[arg(long)]
        raw: bool,

        /// Disable the fetch spinner
        #[arg(long)]
        no_spinner: bool,
    },

    /// Render PNG line charts for the three metric windows
    #[cfg(feature = "charts")]
    Chart {
        /// Output directory for the chart images
        #[arg(short, long, default_value = "charts")]
        output: PathBuf,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Get a configuration value
        #[arg(short, long, value_name = "KEY")]
        get: Option<String>,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long, value_name = "KEY=VALUE")]
        set: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Store a personal access token (sign in)
    Set {
        /// The personal access token pasted from the upstream account page
        pat: String,
    },

    /// Show whether a token is stored
    Status,

    /// Remove the stored token (sign out)
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    // Repeated -v overrides the configured log level
    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    logging::init_logging(&log_config)?;

    let store = TokenStore::default_location()?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Set { pat } => {
                let credential = Credential::new(pat.trim());
                store.set(&credential)?;
                println!(
                    "{} Token {} stored at {}",
                    "✓".green(),
                    credential.redacted(),
                    store.path().display()
                );
            }
            AuthAction::Status => match store.get()? {
                Some(credential) => {
                    println!(
                        "{} Signed in with token {}",
                        "✓".green(),
                        credential.redacted()
                    );
                }
                None => {
                    println!(
                        "{} No token stored. Run {} to sign in.",
                        "✗".red(),
                        "wellrs auth set <PAT>".bold()
                    );
                }
            },
            AuthAction::Clear => {
                store.clear()?;
                println!("{} Signed out; token removed", "✓".green());
            }
        },

        Commands::Dashboard { raw, no_spinner } => {
            let credential = require_credential(&store)?;
            let client = OuraClient::new(&config.upstream).map_err(WellRsError::from)?;

            let spinner = if no_spinner || raw {
                None
            } else {
                Some(fetch_spinner())
            };
            let fetched = client.fetch_windows(&credential).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            let (profile, bundle) = fetched.map_err(WellRsError::from)?;

            if raw {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "profile": profile,
                        "sleep": bundle.sleep,
                        "activity": bundle.activity,
                        "stress": bundle.stress,
                    }))?
                );
            } else {
                let assessment = RiskCalculator::with_config(config.risk.clone()).assess(&bundle);
                print!("{}", render_dashboard(&profile, &bundle, &assessment));
            }
        }

        #[cfg(feature = "charts")]
        Commands::Chart { output } => {
            let credential = require_credential(&store)?;
            let client = OuraClient::new(&config.upstream).map_err(WellRsError::from)?;

            let spinner = fetch_spinner();
            let fetched = client.fetch_windows(&credential).await;
            spinner.finish_and_clear();
            let (_, bundle) = fetched.map_err(WellRsError::from)?;

            let written = wellrs::charts::render_charts(&bundle, &output)?;
            if written.is_empty() {
                println!("{} No data in the window; nothing to chart", "!".yellow());
            } else {
                for path in written {
                    println!("{} Wrote {}", "✓".green(), path.display());
                }
            }
        }

        Commands::Config { list, get, set } => {
            if list {
                for (key, value) in config.list_values() {
                    println!("{} = {}", key.bold(), value);
                }
            } else if let Some(key) = get {
                match config.get_value(&key) {
                    Some(value) => println!("{}", value),
                    None => anyhow::bail!("Unknown configuration key: {}", key),
                }
            } else if let Some(assignment) = set {
                let (key, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got: {}", assignment))?;
                config.set_value(key, value)?;
                match &cli.config {
                    Some(path) => config.save_to_file(path)?,
                    None => config.save_default()?,
                }
                println!("{} {} = {}", "✓".green(), key.bold(), value);
            } else {
                println!("Use --list, --get KEY, or --set KEY=VALUE");
            }
        }
    }

    Ok(())
}

/// Stored credential, or the sign-in error if none is present
fn require_credential(store: &TokenStore) -> Result<Credential, WellRsError> {
    store.get()?.ok_or(WellRsError::MissingCredential)
}

fn fetch_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Fetching wellness data...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
