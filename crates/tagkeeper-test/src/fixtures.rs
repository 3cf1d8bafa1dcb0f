//! Component and task fixtures.
//!
//! [`MockComponent`] builds [`Component`] values with readable timestamps, so
//! tests can say "created 3 hours in" instead of spelling out ISO-8601 strings.

use tagkeeper_core::{Asset, Component, Task};

/// Name of the manifest cleanup task triggered first.
pub const MANIFEST_TASK: &str = "delete-unused-manifests-and-image-task";

/// Name of the blob store compaction task triggered second.
pub const COMPACT_TASK: &str = "compact-blob-store";

/// Returns the timestamp `hours` hours after 2024-01-01T00:00Z.
///
/// # Examples
///
/// ```rust
/// use tagkeeper_test::fixtures::timestamp;
///
/// assert_eq!(timestamp(25), "2024-01-02T01:00:00.000000+00:00");
/// ```
#[must_use]
pub fn timestamp(hours: u32) -> String {
    format!(
        "2024-01-{:02}T{:02}:00:00.000000+00:00",
        1 + hours / 24,
        hours % 24
    )
}

/// The two maintenance tasks a Nexus instance is expected to expose.
#[must_use]
pub fn maintenance_tasks() -> Vec<Task> {
    vec![
        Task::new("task-manifests", MANIFEST_TASK),
        Task::new("task-compact", COMPACT_TASK),
    ]
}

/// Builder for mock components.
///
/// # Examples
///
/// ```rust
/// use tagkeeper_test::MockComponent;
///
/// let component = MockComponent::new("c1")
///     .name("team/api")
///     .version("v1.0.0")
///     .created(3)
///     .digest("sha256:aaa")
///     .build();
///
/// assert_eq!(component.image_name(), "api");
/// assert_eq!(component.digests().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockComponent {
    id: String,
    name: String,
    version: String,
    assets: Vec<Asset>,
}

impl MockComponent {
    /// Creates a builder for a component with the given id.
    ///
    /// Defaults to image `team/app`, version `v-<id>`, and a single asset
    /// created at hour 0 without a digest.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            version: format!("v-{id}"),
            id,
            name: "team/app".to_string(),
            assets: vec![Asset::created(timestamp(0))],
        }
    }

    /// Sets the qualified image name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the version tag.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Tags the component `latest`.
    #[must_use]
    pub fn latest(self) -> Self {
        self.version("latest")
    }

    /// Sets `blobCreated` of the first asset to hour `hours`.
    #[must_use]
    pub fn created(mut self, hours: u32) -> Self {
        self.first_asset().blob_created = Some(timestamp(hours));
        self
    }

    /// Replaces `blobCreated` of the first asset with `lastModified` at hour `hours`.
    #[must_use]
    pub fn modified_only(mut self, hours: u32) -> Self {
        let asset = self.first_asset();
        asset.blob_created = None;
        asset.last_modified = Some(timestamp(hours));
        self
    }

    /// Sets a raw `blobCreated` string on the first asset.
    #[must_use]
    pub fn raw_created(mut self, value: impl Into<String>) -> Self {
        self.first_asset().blob_created = Some(value.into());
        self
    }

    /// Sets the digest of the first asset.
    #[must_use]
    pub fn digest(mut self, digest: impl Into<String>) -> Self {
        self.first_asset().digest = Some(digest.into());
        self
    }

    /// Appends an extra asset carrying `digest`.
    #[must_use]
    pub fn extra_digest(mut self, digest: impl Into<String>) -> Self {
        let created = self.assets.first().and_then(|a| a.blob_created.clone());
        self.assets.push(Asset {
            blob_created: created,
            last_modified: None,
            digest: Some(digest.into()),
        });
        self
    }

    /// Builds the component.
    #[must_use]
    pub fn build(self) -> Component {
        let mut component = Component::new(self.id, self.name, self.version);
        component.assets = self.assets;
        component
    }

    fn first_asset(&mut self) -> &mut Asset {
        if self.assets.is_empty() {
            self.assets.push(Asset::default());
        }
        &mut self.assets[0]
    }
}

/// Builds `count` components of one image, `v1` oldest to `v<count>` newest,
/// each with its own digest.
#[must_use]
pub fn image_history(name: &str, count: u32) -> Vec<Component> {
    (1..=count)
        .map(|n| {
            MockComponent::new(format!("{}-{n}", tagkeeper_core::image_name(name)))
                .name(name)
                .version(format!("v{n}"))
                .created(n)
                .digest(format!("sha256:{}-{n}", tagkeeper_core::image_name(name)))
                .build()
        })
        .collect()
}
