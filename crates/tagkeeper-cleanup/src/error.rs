//! Error types for the cleanup pipeline.
//!
//! Every failure maps onto one of four [`ErrorKind`]s so callers can report a
//! single structured failure for the whole request.

use serde::Serialize;
use tagkeeper_registry::RegistryError;
use thiserror::Error;

/// Result type alias for cleanup operations.
pub type Result<T> = std::result::Result<T, CleanupError>;

/// Errors that abort a cleanup request.
#[derive(Error, Debug)]
pub enum CleanupError {
    /// A registry call failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A named maintenance task is not registered in the backend.
    #[error("Task '{name}' not found")]
    TaskNotFound {
        /// The task name that was looked up.
        name: String,
    },

    /// Component data could not be interpreted.
    #[error("Invalid component data for image '{image}': {source}")]
    Model {
        /// Image whose group failed to resolve.
        image: String,
        /// Underlying error.
        #[source]
        source: tagkeeper_core::Error,
    },
}

/// Category of a cleanup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// A registry call exceeded its deadline.
    UpstreamTimeout,
    /// Any other transport failure or unexpected registry response.
    UpstreamError,
    /// A maintenance task is missing from the backend.
    TaskNotFound,
    /// A timestamp or payload did not match the expected format.
    ParseError,
}

impl ErrorKind {
    /// Returns the kind as a stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamTimeout => "UpstreamTimeout",
            Self::UpstreamError => "UpstreamError",
            Self::TaskNotFound => "TaskNotFound",
            Self::ParseError => "ParseError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CleanupError {
    /// Returns the category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry(e) if e.is_timeout() => ErrorKind::UpstreamTimeout,
            Self::Registry(e) if e.is_payload() => ErrorKind::ParseError,
            Self::Registry(_) => ErrorKind::UpstreamError,
            Self::TaskNotFound { .. } => ErrorKind::TaskNotFound,
            Self::Model { .. } => ErrorKind::ParseError,
        }
    }

    /// Returns the HTTP status returned by the registry, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Registry(e) => e.upstream_status(),
            Self::TaskNotFound { .. } | Self::Model { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_kind() {
        let err = CleanupError::from(RegistryError::Timeout {
            context: "fetching components for repo".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::UpstreamTimeout);
        assert_eq!(err.upstream_status(), None);
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_upstream_kind_carries_status() {
        let err = CleanupError::from(RegistryError::Upstream {
            context: "deleting component abc".to_string(),
            status: Some(500),
            message: "status code: 500".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[test]
    fn test_payload_is_parse_error() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = CleanupError::from(RegistryError::InvalidPayload {
            context: "fetching tasks".to_string(),
            source,
        });
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn test_task_not_found() {
        let err = CleanupError::TaskNotFound {
            name: "compact-blob-store".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TaskNotFound);
        assert_eq!(err.to_string(), "Task 'compact-blob-store' not found");
    }

    #[test]
    fn test_model_error_is_parse_error() {
        let err = CleanupError::Model {
            image: "api".to_string(),
            source: tagkeeper_core::Error::MissingTimestamp {
                component_id: "c1".to_string(),
            },
        };
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.kind().to_string(), "ParseError");
    }
}
