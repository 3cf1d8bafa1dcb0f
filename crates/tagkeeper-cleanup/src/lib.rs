//! Tagkeeper Cleanup
//!
//! This crate runs retention cleanup against a container registry: it
//! deletes old image tags and then asks the backend to reclaim storage.
//!
//! # Overview
//!
//! The pipeline handles:
//! - **Retention**: Keeps the newest N tags per image, `latest`, and anything
//!   sharing a manifest digest with those
//! - **Deletion**: Removes the remaining components one at a time
//! - **Maintenance**: Triggers manifest purge then blob compaction, in order
//! - **Reporting**: Returns a per-image report of deleted tags
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────────┐
//!   │  CleanupService  │
//!   └────────┬─────────┘
//!            │ fetch / group / resolve
//!            ▼
//!   ┌──────────────────┐      ┌──────────────────────┐
//!   │ DeletionExecutor │ ───▶ │ MaintenanceSequencer │
//!   └────────┬─────────┘      └──────────┬───────────┘
//!            │ DELETE                    │ POST run
//!            ▼                           ▼
//!   ┌─────────────────────────────────────────────────┐
//!   │               ComponentRegistry                 │
//!   └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tagkeeper_cleanup::CleanupService;
//! use tagkeeper_registry::{NexusClient, RegistryAuth, RegistryConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig::new("http://localhost:8081")
//!     .with_auth(RegistryAuth::basic("admin", "secret"));
//! let service = CleanupService::new(NexusClient::new(config)?, 10);
//!
//! let report = service.cleanup("docker-hosted", None).await?;
//! println!("Deleted {} tags", report.total_deleted());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod executor;
pub mod maintenance;
pub mod report;
pub mod service;

// Re-export main types at crate root
pub use error::{CleanupError, ErrorKind, Result};
pub use executor::DeletionExecutor;
pub use maintenance::{
    MaintenanceSequencer, COMPACT_BLOB_STORE_TASK, DELETE_UNUSED_MANIFESTS_TASK, MAINTENANCE_TASKS,
};
pub use report::{CleanupReport, DeletedTag, ImageReport, ImageStatus};
pub use service::{CleanupService, HEALTH_MESSAGE};
