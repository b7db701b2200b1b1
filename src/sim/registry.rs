//! Target registry
//!
//! The fixed, ordered set of spots the player can land on. Built once at
//! startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Stable index of a target within the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub usize);

impl TargetId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Opaque handle to a resource owned by a presentation collaborator
/// (a mesh, a particle prefab, an audio clip...). The core only passes it along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle(pub u64);

/// A registered target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Visual shown when the target is placed/highlighted
    pub display: Option<ResourceHandle>,
    /// Sound played when the target is highlighted or stepped on
    pub sound: Option<ResourceHandle>,
}

/// Fixed ordered collection of candidate targets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    /// Registry of `count` targets without any attached resources
    pub fn with_len(count: usize) -> Self {
        Self::from_resources(std::iter::repeat_n((None, None), count))
    }

    /// Build from `(display, sound)` pairs; ids are assigned in iteration order
    pub fn from_resources<I>(resources: I) -> Self
    where
        I: IntoIterator<Item = (Option<ResourceHandle>, Option<ResourceHandle>)>,
    {
        let targets: Vec<Target> = resources
            .into_iter()
            .enumerate()
            .map(|(i, (display, sound))| Target {
                id: TargetId(i),
                display,
                sound,
            })
            .collect();

        if targets.is_empty() {
            log::warn!("Target registry is empty - every pattern will be zero length");
        }

        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id.0)
    }

    pub fn contains(&self, id: TargetId) -> bool {
        id.0 < self.targets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_registration_order() {
        let registry = TargetRegistry::from_resources([
            (Some(ResourceHandle(10)), None),
            (None, Some(ResourceHandle(21))),
            (None, None),
        ]);

        assert_eq!(registry.len(), 3);
        let ids: Vec<_> = registry.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TargetId(0), TargetId(1), TargetId(2)]);
        assert_eq!(registry.get(TargetId(1)).and_then(|t| t.sound), Some(ResourceHandle(21)));
        assert_eq!(registry.get(TargetId(0)).and_then(|t| t.display), Some(ResourceHandle(10)));
    }

    #[test]
    fn test_contains_rejects_out_of_range() {
        let registry = TargetRegistry::with_len(4);
        assert!(registry.contains(TargetId(3)));
        assert!(!registry.contains(TargetId(4)));
        assert!(registry.get(TargetId(9)).is_none());
    }
}
