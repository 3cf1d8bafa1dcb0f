//! # Tagkeeper Test
//!
//! Test support for the Tagkeeper crates:
//!
//! - [`MockRegistry`] - in-memory [`ComponentRegistry`](tagkeeper_registry::ComponentRegistry)
//!   with call recording and failure injection
//! - [`MockComponent`] - fluent builder for registry components
//! - [`fixtures`] - timestamps, image histories and maintenance task lists
//!
//! ## Example
//!
//! ```rust
//! use tagkeeper_test::{fixtures, Failure, MockRegistry};
//!
//! let registry = MockRegistry::new()
//!     .with_components("docker-hosted", fixtures::image_history("team/api", 12))
//!     .with_maintenance_tasks()
//!     .fail_delete("api-1", Failure::Status(500));
//! ```

pub mod fixtures;
pub mod mock_registry;

pub use fixtures::MockComponent;
pub use mock_registry::{Call, Failure, MockRegistry};
