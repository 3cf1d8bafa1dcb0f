//! Error types for Tagkeeper core operations.
//!
//! Every variant here describes registry data that could not be interpreted.
//! Callers surface them as parse failures.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while interpreting registry components.
#[derive(Error, Debug)]
pub enum Error {
    /// Component carries no assets, so it has no creation time.
    #[error("Component {component_id} has no assets")]
    NoAssets {
        /// Identifier of the offending component.
        component_id: String,
    },

    /// Neither `blobCreated` nor `lastModified` is present on the first asset.
    #[error("Component {component_id} has neither blobCreated nor lastModified")]
    MissingTimestamp {
        /// Identifier of the offending component.
        component_id: String,
    },

    /// A timestamp did not match the expected ISO-8601 format.
    #[error("Invalid timestamp '{value}' on component {component_id}: {source}")]
    InvalidTimestamp {
        /// Identifier of the offending component.
        component_id: String,
        /// The raw timestamp string.
        value: String,
        /// Underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// A timestamp omitted the fractional seconds.
    #[error("Invalid timestamp '{value}' on component {component_id}: missing fractional seconds")]
    MissingFractionalSeconds {
        /// Identifier of the offending component.
        component_id: String,
        /// The raw timestamp string.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_assets() {
        let err = Error::NoAssets {
            component_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Component abc has no assets");
    }

    #[test]
    fn test_error_display_missing_timestamp() {
        let err = Error::MissingTimestamp {
            component_id: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Component abc has neither blobCreated nor lastModified"
        );
    }

    #[test]
    fn test_error_display_invalid_timestamp() {
        let source = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        let err = Error::InvalidTimestamp {
            component_id: "abc".to_string(),
            value: "yesterday".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid timestamp 'yesterday' on component abc"));
    }

    #[test]
    fn test_error_display_missing_fraction() {
        let err = Error::MissingFractionalSeconds {
            component_id: "abc".to_string(),
            value: "2024-01-01T10:00:00+00:00".to_string(),
        };
        assert!(err.to_string().ends_with("missing fractional seconds"));
    }
}
