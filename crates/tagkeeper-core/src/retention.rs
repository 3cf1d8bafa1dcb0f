//! Retention decisions for a single image group.
//!
//! A [`RetentionPolicy`] keeps the `keep_tags` newest versions of an image,
//! always keeps `latest`, and never deletes a version whose manifest digest is
//! still referenced by a kept version.

use std::collections::BTreeSet;

use crate::component::Component;
use crate::error::Result;
use crate::grouper::ImageGroup;

/// Default number of newest tags kept per image.
pub const DEFAULT_KEEP_TAGS: usize = 10;

/// "Keep newest N, always keep latest" retention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    keep_tags: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_TAGS)
    }
}

impl RetentionPolicy {
    /// Creates a policy keeping the `keep_tags` newest versions of each image.
    #[must_use]
    pub const fn new(keep_tags: usize) -> Self {
        Self { keep_tags }
    }

    /// Returns the size of the newest-version window.
    #[must_use]
    pub const fn keep_tags(&self) -> usize {
        self.keep_tags
    }

    /// Decides which components of `group` are kept and which are deleted.
    ///
    /// The group itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if any component lacks a parseable creation time.
    pub fn resolve(&self, group: &ImageGroup) -> Result<RetentionPlan> {
        let sorted = sort_newest_first(&group.components)?;
        let window = self.keep_tags.min(sorted.len());

        let whitelist: BTreeSet<String> = sorted[..window]
            .iter()
            .chain(sorted.iter().filter(|c| c.is_latest()))
            .flat_map(|c| c.digests())
            .map(str::to_string)
            .collect();

        let mut keep = sorted[..window].to_vec();
        let mut delete = Vec::new();

        for component in &sorted[window..] {
            let protected =
                component.is_latest() || component.digests().any(|d| whitelist.contains(d));
            if protected {
                keep.push(component.clone());
            } else {
                delete.push(component.clone());
            }
        }

        Ok(RetentionPlan {
            image: group.name.clone(),
            window,
            whitelist,
            keep,
            delete,
        })
    }
}

/// Outcome of resolving one image group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    /// Image name.
    pub image: String,

    /// Number of newest components unconditionally kept.
    pub window: usize,

    /// Digests that must survive this pass.
    pub whitelist: BTreeSet<String>,

    /// Kept components, newest first.
    pub keep: Vec<Component>,

    /// Components to delete, newest first.
    pub delete: Vec<Component>,
}

impl RetentionPlan {
    /// Returns true if nothing will be deleted.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty()
    }
}

/// Orders components newest first. Ties keep their input order.
fn sort_newest_first(components: &[Component]) -> Result<Vec<Component>> {
    let mut stamped = components
        .iter()
        .map(|c| c.created_at().map(|ts| (ts, c)))
        .collect::<Result<Vec<_>>>()?;

    stamped.sort_by(|(a, _), (b, _)| b.cmp(a));

    Ok(stamped.into_iter().map(|(_, c)| c.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Asset;
    use crate::error::Error;

    fn at(day: u32) -> String {
        format!("2024-01-{day:02}T10:00:00.000000+00:00")
    }

    fn component(id: &str, version: &str, day: u32, digest: Option<&str>) -> Component {
        let mut asset = Asset::created(at(day));
        if let Some(d) = digest {
            asset = asset.with_digest(d);
        }
        Component::new(id, "team/api", version).with_asset(asset)
    }

    fn group(components: Vec<Component>) -> ImageGroup {
        ImageGroup {
            name: "api".to_string(),
            components,
        }
    }

    fn ids(components: &[Component]) -> Vec<&str> {
        components.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_twelve_components_keep_ten_deletes_two_oldest() {
        let components: Vec<_> = (1..=12)
            .map(|day| {
                let digest = format!("sha256:{day}");
                component(&format!("c{day}"), &format!("v{day}"), day, Some(&digest))
            })
            .collect();

        let plan = RetentionPolicy::new(10).resolve(&group(components)).unwrap();

        assert_eq!(plan.window, 10);
        assert_eq!(ids(&plan.delete), vec!["c2", "c1"]);
        assert_eq!(plan.keep.len(), 10);
        assert_eq!(plan.keep[0].id, "c12");
    }

    #[test]
    fn test_small_group_is_untouched() {
        let components = vec![
            component("a", "v1", 1, Some("sha256:a")),
            component("b", "v2", 2, None),
            component("c", "v3", 3, Some("sha256:c")),
        ];

        let plan = RetentionPolicy::new(10).resolve(&group(components)).unwrap();

        assert!(plan.is_noop());
        assert_eq!(plan.window, 3);
        assert_eq!(ids(&plan.keep), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_oldest_sharing_digest_with_newest_is_kept() {
        let components = vec![
            component("old", "v1", 1, Some("sha256:shared")),
            component("mid", "v2", 2, Some("sha256:mid")),
            component("new", "v3", 3, Some("sha256:shared")),
        ];

        let plan = RetentionPolicy::new(1).resolve(&group(components)).unwrap();

        assert_eq!(ids(&plan.delete), vec!["mid"]);
        assert!(ids(&plan.keep).contains(&"old"));
    }

    #[test]
    fn test_latest_is_never_deleted() {
        let components = vec![
            component("latest", "latest", 1, None),
            component("v2", "v2", 2, Some("sha256:2")),
            component("v3", "v3", 3, Some("sha256:3")),
        ];

        let plan = RetentionPolicy::new(1).resolve(&group(components)).unwrap();

        assert_eq!(ids(&plan.delete), vec!["v2"]);
        assert!(ids(&plan.keep).contains(&"latest"));
    }

    #[test]
    fn test_latest_digest_protects_other_tags() {
        let components = vec![
            component("latest", "latest", 5, Some("sha256:release")),
            component("release", "v1.0.0", 1, Some("sha256:release")),
            component("v2", "v2", 2, Some("sha256:2")),
        ];

        let plan = RetentionPolicy::new(0).resolve(&group(components)).unwrap();

        assert_eq!(plan.window, 0);
        assert!(plan.whitelist.contains("sha256:release"));
        assert_eq!(ids(&plan.delete), vec!["v2"]);
    }

    #[test]
    fn test_keep_zero_without_latest_deletes_everything() {
        let components = vec![
            component("a", "v1", 1, Some("sha256:a")),
            component("b", "v2", 2, None),
        ];

        let plan = RetentionPolicy::new(0).resolve(&group(components)).unwrap();

        assert!(plan.whitelist.is_empty());
        assert_eq!(ids(&plan.delete), vec!["b", "a"]);
    }

    #[test]
    fn test_digestless_component_outside_window_is_deleted() {
        let components = vec![
            component("new", "v2", 2, Some("sha256:new")),
            component("old", "v1", 1, None),
        ];

        let plan = RetentionPolicy::new(1).resolve(&group(components)).unwrap();

        assert_eq!(ids(&plan.delete), vec!["old"]);
    }

    #[test]
    fn test_any_shared_asset_digest_protects() {
        let old = Component::new("old", "team/api", "v1")
            .with_asset(Asset::created(at(1)).with_digest("sha256:unique"))
            .with_asset(Asset::created(at(1)).with_digest("sha256:shared"));
        let new = component("new", "v2", 2, Some("sha256:shared"));

        let plan = RetentionPolicy::new(1).resolve(&group(vec![old, new])).unwrap();

        assert!(plan.is_noop());
    }

    #[test]
    fn test_mixed_offsets_compare_by_instant() {
        let early = Component::new("early", "api", "v1")
            .with_asset(Asset::created("2024-01-01T12:00:00.000000+02:00"));
        let late = Component::new("late", "api", "v2")
            .with_asset(Asset::created("2024-01-01T11:00:00.000000+00:00"));

        let plan = RetentionPolicy::new(1).resolve(&group(vec![early, late])).unwrap();

        assert_eq!(plan.keep[0].id, "late");
        assert_eq!(ids(&plan.delete), vec!["early"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let components = vec![
            component("first", "v1", 1, None),
            component("second", "v2", 1, None),
        ];

        let plan = RetentionPolicy::new(1).resolve(&group(components)).unwrap();

        assert_eq!(plan.keep[0].id, "first");
        assert_eq!(ids(&plan.delete), vec!["second"]);
    }

    #[test]
    fn test_unparseable_timestamp_fails() {
        let components = vec![
            component("ok", "v1", 1, None),
            Component::new("bad", "api", "v2").with_asset(Asset::created("not-a-date")),
        ];

        let err = RetentionPolicy::new(1).resolve(&group(components)).unwrap_err();

        assert!(matches!(err, Error::InvalidTimestamp { component_id, .. } if component_id == "bad"));
    }

    #[test]
    fn test_resolve_does_not_reorder_group() {
        let components = vec![
            component("a", "v1", 1, None),
            component("b", "v2", 2, None),
        ];
        let g = group(components);

        let _ = RetentionPolicy::new(1).resolve(&g).unwrap();

        assert_eq!(ids(&g.components), vec!["a", "b"]);
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(RetentionPolicy::default().keep_tags(), DEFAULT_KEEP_TAGS);
    }
}
