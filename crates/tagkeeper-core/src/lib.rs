//! # Tagkeeper Core
//!
//! Component model and retention decision engine for Tagkeeper.
//!
//! This crate holds the pure, I/O-free part of a cleanup run:
//!
//! - [`Component`], [`Asset`], [`Task`] - typed records returned by the registry
//! - [`group_by_image`] - partitions components by image name
//! - [`RetentionPolicy`] - decides which versions of an image survive
//!
//! ## Example
//!
//! ```rust
//! use tagkeeper_core::{group_by_image, Asset, Component, RetentionPolicy};
//!
//! let components = vec![
//!     Component::new("c1", "team/api", "v2")
//!         .with_asset(Asset::created("2024-02-01T10:00:00.000000+00:00").with_digest("sha256:b")),
//!     Component::new("c2", "team/api", "v1")
//!         .with_asset(Asset::created("2024-01-01T10:00:00.000000+00:00").with_digest("sha256:a")),
//! ];
//!
//! let policy = RetentionPolicy::new(1);
//! for group in group_by_image(components) {
//!     let plan = policy.resolve(&group).unwrap();
//!     assert_eq!(plan.delete.len(), 1);
//!     assert_eq!(plan.delete[0].version, "v1");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod component;
pub mod error;
pub mod grouper;
pub mod retention;


// Re-export main types at crate root
pub use component::{Asset, Component, ComponentPage, Task, TaskList, LATEST_TAG};
pub use error::{Error, Result};
pub use grouper::{count_images, group_by_image, image_name, ImageGroup};
pub use retention::{RetentionPlan, RetentionPolicy, DEFAULT_KEEP_TAGS};
