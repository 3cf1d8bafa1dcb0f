//! Count-images command.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::settings::Settings;

/// Arguments for the count-images command.
#[derive(Args)]
pub struct CountImagesArgs {
    /// Repository to inspect
    pub repository: String,
}

/// Runs the count-images command.
pub async fn execute(settings: &Settings, args: &CountImagesArgs) -> Result<()> {
    let service = settings.cleanup_service()?;

    let total = service
        .count_images(&args.repository)
        .await
        .with_context(|| format!("Failed to count images in '{}'", args.repository))?;

    super::print_json(&json!({
        "total_images": total,
        "repository": args.repository,
    }))
}
