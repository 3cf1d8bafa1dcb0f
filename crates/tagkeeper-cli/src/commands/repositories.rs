//! Repositories command.

use anyhow::{Context, Result};

use crate::settings::Settings;

/// Runs the repositories command.
pub async fn execute(settings: &Settings) -> Result<()> {
    let service = settings.cleanup_service()?;

    let repositories = service
        .list_repositories()
        .await
        .context("Failed to list repositories")?;

    super::print_json(&repositories)
}
