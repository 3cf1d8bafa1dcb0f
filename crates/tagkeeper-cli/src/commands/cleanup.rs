//! Cleanup command: one retention run, report printed as JSON.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::settings::Settings;

/// Arguments for the cleanup command.
#[derive(Args)]
pub struct CleanupArgs {
    /// Repository to clean
    pub repository: String,

    /// Tags to keep per image (overrides the default)
    #[arg(long)]
    pub keep_tags: Option<usize>,
}

/// Runs the cleanup command.
pub async fn execute(settings: &Settings, args: &CleanupArgs) -> Result<()> {
    let service = settings.cleanup_service()?;

    let report = service
        .cleanup(&args.repository, args.keep_tags)
        .await
        .with_context(|| format!("Cleanup of '{}' failed", args.repository))?;

    info!(
        repository = %args.repository,
        total_deleted = report.total_deleted(),
        "cleanup finished"
    );

    super::print_json(&report)
}
