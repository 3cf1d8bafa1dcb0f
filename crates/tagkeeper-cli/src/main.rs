//! Tagkeeper CLI - retention cleanup for Nexus-hosted container images.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod server;
mod settings;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagkeeper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(&cli.settings, &args).await,
        Commands::Cleanup(args) => commands::cleanup::execute(&cli.settings, &args).await,
        Commands::CountImages(args) => commands::count_images::execute(&cli.settings, &args).await,
        Commands::Repositories => commands::repositories::execute(&cli.settings).await,
    }
}
