//! Typed records for registry components, assets and tasks.
//!
//! These mirror the JSON returned by the Nexus REST API. Unknown fields are
//! ignored, but missing required fields fail deserialization.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version string that is never deleted and always whitelisted.
pub const LATEST_TAG: &str = "latest";

/// Placeholder reported when a deleted component had no `blobCreated`.
pub const NOT_AVAILABLE: &str = "N/A";

/// Layout of `blobCreated` and `lastModified`, e.g.
/// `2024-01-01T10:00:00.000000+00:00`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// One stored, versioned image artifact.
///
/// # Examples
///
/// ```rust
/// use tagkeeper_core::{Asset, Component};
///
/// let component = Component::new("id-1", "docker/team/api", "v1.0.0")
///     .with_asset(Asset::created("2024-01-01T00:00:00.000000+00:00"));
/// assert_eq!(component.image_name(), "api");
/// assert!(!component.is_latest());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Opaque identifier, unique within the registry.
    pub id: String,

    /// Repository the component belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Qualified image path.
    pub name: String,

    /// Tag of this image version.
    pub version: String,

    /// Blobs and manifests attached to this component.
    pub assets: Vec<Asset>,
}

impl Component {
    /// Creates a component without assets.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            repository: None,
            name: name.into(),
            version: version.into(),
            assets: Vec::new(),
        }
    }

    /// Appends an asset.
    #[must_use]
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Returns the image name: the last `/`-separated segment of [`Self::name`].
    #[must_use]
    pub fn image_name(&self) -> &str {
        crate::grouper::image_name(&self.name)
    }

    /// Returns true if this component is tagged `latest`.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.version == LATEST_TAG
    }

    /// Iterates over every digest carried by this component's assets.
    pub fn digests(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().filter_map(|a| a.digest.as_deref())
    }

    /// Returns the first asset's `blobCreated`, or `"N/A"`.
    #[must_use]
    pub fn blob_created_or_na(&self) -> &str {
        self.assets
            .first()
            .and_then(|a| a.blob_created.as_deref())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Parses the effective creation time of this component.
    ///
    /// Uses the first asset's `blobCreated`, falling back to `lastModified`.
    ///
    /// # Errors
    ///
    /// Returns an error if the component has no assets, if the first asset
    /// carries neither timestamp, or if the timestamp is malformed.
    pub fn created_at(&self) -> Result<DateTime<FixedOffset>> {
        let asset = self.assets.first().ok_or_else(|| Error::NoAssets {
            component_id: self.id.clone(),
        })?;

        let raw = asset
            .effective_timestamp()
            .ok_or_else(|| Error::MissingTimestamp {
                component_id: self.id.clone(),
            })?;

        let parsed =
            DateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|source| {
                Error::InvalidTimestamp {
                    component_id: self.id.clone(),
                    value: raw.to_string(),
                    source,
                }
            })?;

        // `%.f` also matches an absent fraction; the registry always sends one.
        if !has_fractional_seconds(raw) {
            return Err(Error::MissingFractionalSeconds {
                component_id: self.id.clone(),
                value: raw.to_string(),
            });
        }

        Ok(parsed)
    }
}

fn has_fractional_seconds(raw: &str) -> bool {
    raw.split_once('T')
        .is_some_and(|(_, time)| time.contains('.'))
}

/// One blob or manifest attached to a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Authoritative creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_created: Option<String>,

    /// Fallback creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// Content hash of the image manifest.
    #[serde(
        default,
        rename = "docker.image.manifest.digest",
        skip_serializing_if = "Option::is_none"
    )]
    pub digest: Option<String>,
}

impl Asset {
    /// Creates an asset with the given `blobCreated` timestamp.
    #[must_use]
    pub fn created(timestamp: impl Into<String>) -> Self {
        Self {
            blob_created: Some(timestamp.into()),
            ..Self::default()
        }
    }

    /// Creates an asset with only a `lastModified` timestamp.
    #[must_use]
    pub fn modified(timestamp: impl Into<String>) -> Self {
        Self {
            last_modified: Some(timestamp.into()),
            ..Self::default()
        }
    }

    /// Sets the manifest digest.
    #[must_use]
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Returns `blobCreated` if present, else `lastModified`.
    #[must_use]
    pub fn effective_timestamp(&self) -> Option<&str> {
        self.blob_created
            .as_deref()
            .or(self.last_modified.as_deref())
    }
}

/// One page of the component listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPage {
    /// Components on this page.
    pub items: Vec<Component>,

    /// Cursor for the next page.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl ComponentPage {
    /// Returns the cursor for the next page, treating an empty token as the end.
    #[must_use]
    pub fn next_token(&self) -> Option<&str> {
        self.continuation_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// A scheduled backend task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier used to trigger it.
    pub id: String,

    /// Human-readable task name.
    pub name: String,
}

impl Task {
    /// Creates a task record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Response body of the task listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    /// Known tasks.
    #[serde(default)]
    pub items: Vec<Task>,
}
