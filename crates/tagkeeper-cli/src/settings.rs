//! Process-wide settings.
//!
//! Parsed once at startup from flags and environment variables, then passed
//! explicitly to whatever needs them.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tagkeeper_cleanup::CleanupService;
use tagkeeper_core::DEFAULT_KEEP_TAGS;
use tagkeeper_registry::{NexusClient, RegistryAuth, RegistryConfig};
use url::Url;

/// Connection and retention settings shared by all commands.
#[derive(Args, Clone)]
pub struct Settings {
    /// Base URL of the Nexus instance
    #[arg(long, env = "NEXUS_URL", default_value = "http://localhost:8081")]
    pub nexus_url: Url,

    /// Nexus username
    #[arg(long, env = "NEXUS_USERNAME", default_value = "admin")]
    pub username: String,

    /// Nexus password
    #[arg(long, env = "NEXUS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Default number of newest tags to keep per image
    #[arg(long, env = "KEEP_TAGS", default_value_t = DEFAULT_KEEP_TAGS)]
    pub keep_tags: usize,

    /// Timeout for every Nexus request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 60)]
    pub request_timeout: u64,

    /// Task status poll interval, in seconds (reserved)
    #[arg(long, env = "POLL_INTERVAL", default_value_t = 5)]
    pub poll_interval: u64,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("nexus_url", &self.nexus_url.as_str())
            .field("username", &self.username)
            .field("password", &"***")
            .field("keep_tags", &self.keep_tags)
            .field("request_timeout", &self.request_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Settings {
    /// Builds the registry client configuration.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::new(self.nexus_url.as_str())
            .with_auth(RegistryAuth::basic(&self.username, &self.password))
            .with_timeout(Duration::from_secs(self.request_timeout))
    }

    /// Builds the cleanup service backed by a Nexus client.
    pub fn cleanup_service(&self) -> Result<CleanupService<NexusClient>> {
        tracing::debug!(settings = ?self, "loaded settings");

        let client = NexusClient::new(self.registry_config())
            .with_context(|| format!("Failed to create Nexus client for {}", self.nexus_url))?;
        Ok(CleanupService::new(client, self.keep_tags))
    }
}
