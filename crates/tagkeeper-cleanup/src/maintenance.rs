//! Post-cleanup maintenance tasks.
//!
//! Deleting components only unlinks manifests. Space is reclaimed by two
//! backend tasks that must run in a fixed order: unused manifests and images
//! are purged first, then the blob store is compacted.

use tagkeeper_core::Task;
use tagkeeper_registry::ComponentRegistry;
use uuid::Uuid;

use crate::error::{CleanupError, Result};

/// Task that purges manifests and images no longer referenced by a tag.
pub const DELETE_UNUSED_MANIFESTS_TASK: &str = "delete-unused-manifests-and-image-task";

/// Task that compacts the blob store.
pub const COMPACT_BLOB_STORE_TASK: &str = "compact-blob-store";

/// Maintenance tasks in trigger order.
pub const MAINTENANCE_TASKS: [&str; 2] = [DELETE_UNUSED_MANIFESTS_TASK, COMPACT_BLOB_STORE_TASK];

/// Triggers maintenance tasks by name, one after the other.
///
/// Each task is looked up with a fresh task listing right before it is
/// triggered. Triggering only asks the backend to start the task; completion
/// is not awaited.
pub struct MaintenanceSequencer<'a, R: ComponentRegistry + ?Sized> {
    registry: &'a R,
    run_id: Uuid,
}

impl<'a, R: ComponentRegistry + ?Sized> MaintenanceSequencer<'a, R> {
    /// Creates a sequencer bound to a registry and a run id used in logs.
    pub fn new(registry: &'a R, run_id: Uuid) -> Self {
        Self { registry, run_id }
    }

    /// Triggers [`MAINTENANCE_TASKS`] in order and returns the names of the
    /// tasks that were started.
    ///
    /// The first failure aborts the sequence, so the compaction task never
    /// runs if the manifest task could not be started.
    pub async fn run(&self) -> Result<Vec<String>> {
        let mut started = Vec::with_capacity(MAINTENANCE_TASKS.len());
        for name in MAINTENANCE_TASKS {
            self.trigger(name).await?;
            started.push(name.to_string());
        }
        Ok(started)
    }

    /// Resolves a task by name and triggers it.
    pub async fn trigger(&self, name: &str) -> Result<Task> {
        let task = self.resolve(name).await?;

        tracing::info!(
            run_id = %self.run_id,
            task = %task.name,
            task_id = %task.id,
            "triggering maintenance task"
        );

        if let Err(e) = self.registry.trigger_task(&task.id).await {
            tracing::error!(
                run_id = %self.run_id,
                task = %task.name,
                task_id = %task.id,
                error = %e,
                "failed to trigger maintenance task"
            );
            return Err(e.into());
        }

        Ok(task)
    }

    async fn resolve(&self, name: &str) -> Result<Task> {
        let tasks = self.registry.list_tasks().await?;
        tasks.into_iter().find(|t| t.name == name).ok_or_else(|| {
            tracing::error!(run_id = %self.run_id, task = %name, "maintenance task not found");
            CleanupError::TaskNotFound {
                name: name.to_string(),
            }
        })
    }
}
