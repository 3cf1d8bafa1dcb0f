//! Partitioning of components into per-image groups.

use std::collections::{HashMap, HashSet};

use crate::component::Component;

/// All components sharing one image name.
///
/// Components appear in the order they were listed by the registry; the
/// retention resolver establishes the newest-first order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    /// Image name (last path segment of the component name).
    pub name: String,

    /// Components of this image.
    pub components: Vec<Component>,
}

impl ImageGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Number of components in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the group has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Extracts the image name from a qualified component name.
///
/// # Examples
///
/// ```rust
/// use tagkeeper_core::image_name;
///
/// assert_eq!(image_name("library/team/api"), "api");
/// assert_eq!(image_name("api"), "api");
/// ```
#[must_use]
pub fn image_name(qualified: &str) -> &str {
    qualified.rsplit('/').next().unwrap_or(qualified)
}

/// Groups components by image name, keeping image names in first-seen order.
#[must_use]
pub fn group_by_image(components: impl IntoIterator<Item = Component>) -> Vec<ImageGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ImageGroup> = Vec::new();

    for component in components {
        let name = component.image_name().to_string();
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            groups.push(ImageGroup::new(name));
            groups.len() - 1
        });
        groups[slot].components.push(component);
    }

    groups
}

/// Counts distinct image names among the components.
#[must_use]
pub fn count_images<'a>(components: impl IntoIterator<Item = &'a Component>) -> usize {
    components
        .into_iter()
        .map(Component::image_name)
        .collect::<HashSet<_>>()
        .len()
}
