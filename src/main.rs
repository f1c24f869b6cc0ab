//! Scriptcast CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use scriptcast::cli::{commands, log_filter, Cli, Commands};
use scriptcast::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            log_filter(cli.verbose, &settings.general.log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Generate {
            topic,
            output,
            no_save,
        } => {
            commands::run_generate(topic, output.clone(), *no_save, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_ref().map(PathBuf::from))?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_ref().map(PathBuf::from))?;
        }
    }

    Ok(())
}
