//! Report types returned by a cleanup run.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tagkeeper_core::Component;
use uuid::Uuid;

/// Outcome for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    /// At least one tag was deleted.
    Cleaned,
    /// Nothing was deleted.
    Skipped,
}

/// A tag removed from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedTag {
    /// Version tag.
    pub version: String,
    /// Component identifier.
    pub id: String,
    /// `blobCreated` of the first asset, or `"N/A"`.
    pub blob_created: String,
}

impl From<&Component> for DeletedTag {
    fn from(component: &Component) -> Self {
        Self {
            version: component.version.clone(),
            id: component.id.clone(),
            blob_created: component.blob_created_or_na().to_string(),
        }
    }
}

/// Deletion report for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    /// Image name. Serialized as the key of the per-image map.
    #[serde(skip)]
    pub image: String,

    /// `cleaned` if any tag was deleted, else `skipped`.
    pub status: ImageStatus,

    /// Deleted tags, newest first.
    pub deleted_tags: Vec<DeletedTag>,

    /// Number of deleted tags.
    pub total_deleted: usize,
}

impl ImageReport {
    /// Creates a report with nothing deleted yet.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            status: ImageStatus::Skipped,
            deleted_tags: Vec::new(),
            total_deleted: 0,
        }
    }

    /// Records a successful deletion.
    pub fn record(&mut self, component: &Component) {
        self.deleted_tags.push(DeletedTag::from(component));
        self.total_deleted = self.deleted_tags.len();
        self.status = ImageStatus::Cleaned;
    }
}

/// Result of a whole cleanup request.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    /// Identifier of this run, shared by all its log lines.
    pub run_id: Uuid,

    /// Repository that was cleaned.
    pub repository: String,

    /// Number of newest tags kept per image.
    pub keep_tags: usize,

    /// Per-image reports, in first-seen image order.
    #[serde(serialize_with = "images_as_map")]
    pub images: Vec<ImageReport>,

    /// Maintenance tasks that were accepted to run, in trigger order.
    pub tasks_started: Vec<String>,
}

impl CleanupReport {
    /// Total number of deleted components across all images.
    pub fn total_deleted(&self) -> usize {
        self.images.iter().map(|r| r.total_deleted).sum()
    }

    /// Looks up the report for one image.
    pub fn image(&self, name: &str) -> Option<&ImageReport> {
        self.images.iter().find(|r| r.image == name)
    }
}

fn images_as_map<S: Serializer>(images: &[ImageReport], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(images.len()))?;
    for report in images {
        map.serialize_entry(&report.image, report)?;
    }
    map.end()
}
