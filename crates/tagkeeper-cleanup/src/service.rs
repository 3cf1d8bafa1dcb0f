//! The cleanup service.
//!
//! [`CleanupService`] runs the full pipeline for a repository:
//!
//! ```text
//! fetch components -> group by image -> resolve every group
//!     -> delete per group -> trigger maintenance tasks
//! ```
//!
//! Every group is resolved before the first deletion, so malformed component
//! data aborts the request without touching the registry.

use serde_json::Value;
use tagkeeper_core::{count_images, group_by_image, RetentionPlan, RetentionPolicy};
use tagkeeper_registry::ComponentRegistry;
use uuid::Uuid;

use crate::error::{CleanupError, Result};
use crate::executor::DeletionExecutor;
use crate::maintenance::MaintenanceSequencer;
use crate::report::CleanupReport;

/// Message returned by the health probe.
pub const HEALTH_MESSAGE: &str = "Service is running";

/// Retention cleanup over a [`ComponentRegistry`].
pub struct CleanupService<R> {
    registry: R,
    default_keep_tags: usize,
}

impl<R: ComponentRegistry> CleanupService<R> {
    /// Creates a service that keeps `default_keep_tags` tags per image unless
    /// a request says otherwise.
    pub fn new(registry: R, default_keep_tags: usize) -> Self {
        Self {
            registry,
            default_keep_tags,
        }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Liveness probe. Makes no upstream call.
    pub fn health(&self) -> &'static str {
        HEALTH_MESSAGE
    }

    /// Lists the repositories known to the registry, unmodified.
    pub async fn list_repositories(&self) -> Result<Value> {
        Ok(self.registry.list_repositories().await?)
    }

    /// Counts distinct image names in a repository.
    pub async fn count_images(&self, repository: &str) -> Result<usize> {
        let components = self.registry.fetch_all_components(repository).await?;
        let total = count_images(&components);

        tracing::debug!(
            repository = %repository,
            components = components.len(),
            total_images = total,
            "counted images"
        );

        Ok(total)
    }

    /// Applies the retention policy to every image in `repository`, then
    /// triggers the maintenance tasks.
    ///
    /// `keep_tags` overrides the default keep count for this request.
    /// Failures abort the request at the failing step; deletions already made
    /// are not undone.
    pub async fn cleanup(&self, repository: &str, keep_tags: Option<usize>) -> Result<CleanupReport> {
        let keep_tags = keep_tags.unwrap_or(self.default_keep_tags);
        let run_id = Uuid::now_v7();

        tracing::info!(
            run_id = %run_id,
            repository = %repository,
            keep_tags,
            "starting cleanup"
        );

        let components = self.registry.fetch_all_components(repository).await?;
        let groups = group_by_image(components);

        tracing::info!(
            run_id = %run_id,
            repository = %repository,
            image_count = groups.len(),
            "grouped components by image"
        );

        let policy = RetentionPolicy::new(keep_tags);
        let plans = groups
            .iter()
            .map(|group| {
                policy.resolve(group).map_err(|source| CleanupError::Model {
                    image: group.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<RetentionPlan>>>()?;

        let executor = DeletionExecutor::new(&self.registry, run_id);
        let mut images = Vec::with_capacity(plans.len());
        for plan in &plans {
            images.push(executor.execute(plan).await?);
        }

        let tasks_started = MaintenanceSequencer::new(&self.registry, run_id).run().await?;

        let report = CleanupReport {
            run_id,
            repository: repository.to_string(),
            keep_tags,
            images,
            tasks_started,
        };

        tracing::info!(
            run_id = %run_id,
            repository = %repository,
            total_deleted = report.total_deleted(),
            "cleanup complete"
        );

        Ok(report)
    }
}
