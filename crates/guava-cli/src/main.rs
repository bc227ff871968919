//! Guava CLI - browse subscription services and manage bookmarks from the terminal.

mod cli;
mod commands;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::bookmarks::run_bookmarks;
use crate::commands::common::SessionOptions;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::prefs::run_prefs;
use crate::commands::services::run_services;
use crate::commands::subs::run_subscriptions;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("guava=info")),
        )
        .init();

    let cli = Cli::parse();
    let options = SessionOptions {
        config_path: cli.config,
        storage_path: cli.storage,
        api_base_url: cli.api,
    };

    match cli.command {
        Commands::Auth { command } => run_auth(command, &options).await,
        Commands::Bookmarks { command } => run_bookmarks(command, &options).await,
        Commands::Services { command } => run_services(command, &options).await,
        Commands::Subs { command } => run_subscriptions(command, &options).await,
        Commands::Prefs { command } => run_prefs(command, &options).await,
        Commands::Config { command } => run_config(command, &options),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}
