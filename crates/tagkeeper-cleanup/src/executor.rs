//! Deletion of components selected by a retention plan.
//!
//! This is the only part of the pipeline with destructive side effects.
//! Deletions are issued one at a time, in plan order.

use tagkeeper_core::RetentionPlan;
use tagkeeper_registry::ComponentRegistry;
use uuid::Uuid;

use crate::error::Result;
use crate::report::ImageReport;

/// Applies retention plans against a registry.
pub struct DeletionExecutor<'a, R: ComponentRegistry + ?Sized> {
    registry: &'a R,
    run_id: Uuid,
}

impl<'a, R: ComponentRegistry + ?Sized> DeletionExecutor<'a, R> {
    /// Creates an executor bound to a registry and a run id used in logs.
    pub fn new(registry: &'a R, run_id: Uuid) -> Self {
        Self { registry, run_id }
    }

    /// Deletes every component in `plan.delete`, in order.
    ///
    /// Stops at the first failed deletion; components deleted before the
    /// failure stay deleted.
    pub async fn execute(&self, plan: &RetentionPlan) -> Result<ImageReport> {
        let mut report = ImageReport::new(&plan.image);

        if plan.is_noop() {
            tracing::info!(
                run_id = %self.run_id,
                image = %plan.image,
                kept = plan.keep.len(),
                "nothing to delete"
            );
            return Ok(report);
        }

        for component in &plan.delete {
            if let Err(e) = self.registry.delete_component(&component.id).await {
                tracing::error!(
                    run_id = %self.run_id,
                    image = %plan.image,
                    component_id = %component.id,
                    version = %component.version,
                    error = %e,
                    "failed to delete component, aborting"
                );
                return Err(e.into());
            }

            tracing::info!(
                run_id = %self.run_id,
                image = %plan.image,
                component_id = %component.id,
                version = %component.version,
                "deleted component"
            );
            report.record(component);
        }

        Ok(report)
    }
}
