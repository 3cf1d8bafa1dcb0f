//! Serve command: runs the cleanup HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::server;
use crate::settings::Settings;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "TAGKEEPER_LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,
}

/// Runs the HTTP server until the process is stopped.
pub async fn execute(settings: &Settings, args: &ServeArgs) -> Result<()> {
    let service = Arc::new(settings.cleanup_service()?);
    let router = server::router(service);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;

    info!(
        listen = %args.listen,
        nexus_url = %settings.nexus_url,
        keep_tags = settings.keep_tags,
        request_timeout_secs = settings.request_timeout,
        poll_interval_secs = settings.poll_interval,
        "tagkeeper listening"
    );

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")
}
