//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A request exceeded the configured timeout.
    #[error("Request to Nexus timed out while {context}")]
    Timeout {
        /// What the client was doing.
        context: String,
    },

    /// Transport failure or unexpected HTTP status from the registry.
    #[error("Failed {context}: {message}")]
    Upstream {
        /// What the client was doing.
        context: String,
        /// HTTP status code, if a response was received.
        status: Option<u16>,
        /// Upstream error detail.
        message: String,
    },

    /// Response body did not match the expected schema.
    #[error("Malformed response while {context}: {source}")]
    InvalidPayload {
        /// What the client was doing.
        context: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Credentials cannot be encoded into an HTTP header.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials {
        /// Error message.
        message: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client for {url}: {source}")]
    ClientBuild {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },
}

impl RegistryError {
    /// Classifies a reqwest failure, separating timeouts from everything else.
    pub(crate) fn transport(context: impl Into<String>, err: reqwest::Error) -> Self {
        let context = context.into();
        if err.is_timeout() {
            Self::Timeout { context }
        } else {
            Self::Upstream {
                context,
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    /// Builds an error for an unexpected HTTP status.
    pub(crate) fn status(context: impl Into<String>, status: u16, body: String) -> Self {
        let message = if body.is_empty() {
            format!("status code: {status}")
        } else {
            format!("status code: {status}: {body}")
        };
        Self::Upstream {
            context: context.into(),
            status: Some(status),
            message,
        }
    }

    /// Returns true if the request timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if the registry answered with something unparseable.
    #[must_use]
    pub const fn is_payload(&self) -> bool {
        matches!(self, Self::InvalidPayload { .. })
    }

    /// Returns the upstream HTTP status, if one was received.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}
