//! # Tagkeeper Registry
//!
//! Client for the Nexus Repository Manager REST API, covering the calls a
//! retention run needs: paginated component listing, component deletion,
//! repository listing, and maintenance task triggering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tagkeeper_registry::{ComponentRegistry, NexusClient, RegistryAuth, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistryConfig::new("http://localhost:8081")
//!         .with_auth(RegistryAuth::basic("admin", "admin123"));
//!
//!     let client = NexusClient::new(config)?;
//!     let components = client.fetch_all_components("docker-hosted").await?;
//!     println!("{} components", components.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! All requests share one basic-auth credential pair and one fixed timeout.
//! Nothing is retried: a timeout surfaces as [`RegistryError::Timeout`], every
//! other failure as [`RegistryError::Upstream`] or
//! [`RegistryError::InvalidPayload`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod client;
mod config;
mod error;

pub use client::{ComponentRegistry, NexusClient};
pub use config::{RegistryAuth, RegistryConfig, DEFAULT_TIMEOUT};
pub use error::RegistryError;
