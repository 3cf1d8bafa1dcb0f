//! CLI commands and argument parsing.

pub mod cleanup;
pub mod count_images;
pub mod repositories;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::settings::Settings;

/// Tagkeeper - keeps the newest image tags in a Nexus repository and
/// deletes the rest
#[derive(Parser)]
#[command(name = "tagkeeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the cleanup API over HTTP
    Serve(serve::ServeArgs),

    /// Run a cleanup for one repository
    Cleanup(cleanup::CleanupArgs),

    /// Count distinct images in a repository
    CountImages(count_images::CountImagesArgs),

    /// List repositories known to Nexus
    Repositories,
}

/// Prints a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
