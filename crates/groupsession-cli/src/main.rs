//! groupsession CLI
//!
//! Runnable usage samples for the GroupSession client library

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod samples;

use config::{Config, Overrides};

#[derive(Parser, Debug)]
#[command(name = "groupsession", version)]
#[command(about = "Usage samples for the GroupSession API client", long_about = None)]
struct Cli {
    /// Config file (default: $GROUPSESSION_CONFIG, ./groupsession.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, e.g. http://localhost:8080/gsession
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Login user ID
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Login password
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Login, session handling and logout
    Basic,
    /// Current user, listing, search and paging
    Users,
    /// Groups, group details and members
    Groups,
    /// Schedule create, read, update and delete
    Schedules,
    /// Send, read, mark and delete messages
    Messages,
    /// Failure handling, retries and error categories
    Errors,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::resolve(cli.config.as_deref())?.with_overrides(Overrides {
        base_url: cli.base_url,
        timeout_ms: cli.timeout_ms,
        user: cli.user,
        password: cli.password,
    });
    tracing::debug!(base_url = %config.client.base_url, "resolved configuration");

    match cli.command {
        Commands::Basic => samples::basic::run(&config).await,
        Commands::Users => samples::users::run(&config).await,
        Commands::Groups => samples::groups::run(&config).await,
        Commands::Schedules => samples::schedules::run(&config).await,
        Commands::Messages => samples::messages::run(&config).await,
        Commands::Errors => samples::errors::run(&config).await,
    }
}
