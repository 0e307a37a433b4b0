//! Committed annotation groups.
//!
//! The store is the canonical data model: the editor only writes to it when an
//! edit is confirmed, and reads it back when an edit is rejected.

use crate::model::{AnnotationGroup, ShapeCategory};

/// The committed list of annotation groups, matched by type tag.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// Groups in commit order
    groups: Vec<AnnotationGroup>,
    /// Number of groups with both region and direction committed
    drews: usize,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list unless it is structurally equal to the current one.
    ///
    /// Returns whether anything changed. The completed-group counter is
    /// recomputed from the new list.
    pub fn replace_all(&mut self, new_groups: &[AnnotationGroup]) -> bool {
        if self.groups.as_slice() == new_groups {
            log::trace!("replace_all: value unchanged ({} groups)", new_groups.len());
            return false;
        }
        self.groups = new_groups.to_vec();
        self.drews = self.groups.iter().filter(|g| g.is_complete()).count();
        log::debug!(
            "replace_all: {} groups, {} complete",
            self.groups.len(),
            self.drews
        );
        true
    }

    /// Write one half of an entry, or delete the entry when `category` is
    /// `None`.
    ///
    /// The entry is addressed by its position when known. Otherwise a typed
    /// group is matched by `kind`; untyped groups are never matched by type, so
    /// writing one without a position appends a new entry. Returns the updated
    /// list.
    pub fn upsert_geometry(
        &mut self,
        entry: Option<usize>,
        kind: Option<&str>,
        category: Option<ShapeCategory>,
        points: Vec<f32>,
    ) -> &[AnnotationGroup] {
        let index = entry
            .filter(|&i| i < self.groups.len())
            .or_else(|| kind.and_then(|k| self.find(k)));
        match (category, index) {
            (Some(category), Some(i)) => {
                self.groups[i].set_geometry(category, points);
            }
            (Some(category), None) => {
                let mut group = AnnotationGroup::with_region(kind.map(str::to_string), Vec::new());
                group.set_geometry(category, points);
                self.groups.push(group);
            }
            (None, Some(i)) => {
                self.groups.remove(i);
            }
            (None, None) => {
                log::trace!("upsert_geometry: nothing to delete for type {:?}", kind);
            }
        }
        &self.groups
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&AnnotationGroup> {
        self.groups.get(index)
    }

    /// Position of the entry tagged `kind`.
    pub fn find(&self, kind: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.kind.as_deref() == Some(kind))
    }

    /// Check whether an entry tagged `kind` exists.
    pub fn contains(&self, kind: &str) -> bool {
        self.find(kind).is_some()
    }

    /// Position of the first entry that still lacks its direction.
    pub fn first_unfinished(&self) -> Option<usize> {
        self.groups.iter().position(|g| !g.is_complete())
    }

    /// Number of fully committed groups.
    pub fn count(&self) -> usize {
        self.drews
    }

    /// Record that a group received its direction.
    pub fn mark_completed(&mut self) {
        self.drews += 1;
    }

    /// Record that a complete group was removed.
    pub fn unmark_completed(&mut self) {
        self.drews = self.drews.saturating_sub(1);
    }

    /// All groups, in commit order.
    pub fn groups(&self) -> &[AnnotationGroup] {
        &self.groups
    }

    /// Get the number of stored groups, complete or not.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(kind: &str) -> AnnotationGroup {
        AnnotationGroup {
            kind: Some(kind.to_string()),
            points: vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0],
            direction: vec![5.0, 5.0, 15.0, 5.0],
        }
    }

    #[test]
    fn test_replace_all_is_idempotent() {
        let mut store = AnnotationStore::new();
        let value = vec![square("a"), square("b")];
        assert!(store.replace_all(&value));
        assert_eq!(store.count(), 2);

        // Structurally equal copy, different allocation
        let copy: Vec<AnnotationGroup> = value.iter().cloned().collect();
        assert!(!store.replace_all(&copy));
        assert_eq!(store.count(), 2);
        assert_eq!(store.groups(), value.as_slice());
    }

    #[test]
    fn test_replace_all_counts_only_complete_groups() {
        let mut store = AnnotationStore::new();
        let mut partial = square("b");
        partial.direction.clear();
        assert!(store.replace_all(&[square("a"), partial]));
        assert_eq!(store.len(), 2);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_replace_all_copies_input() {
        let mut store = AnnotationStore::new();
        let mut value = vec![square("a")];
        store.replace_all(&value);
        value[0].points[0] = 99.0;
        assert_eq!(store.groups()[0].points[0], 0.0);
    }

    #[test]
    fn test_upsert_appends_then_overwrites() {
        let mut store = AnnotationStore::new();
        store.upsert_geometry(None, Some("a"), Some(ShapeCategory::Polygon), vec![1.0, 1.0]);
        assert_eq!(store.len(), 1);
        assert!(store.get(0).is_some_and(|g| g.direction.is_empty()));

        let groups = store.upsert_geometry(None, Some("a"), Some(ShapeCategory::Arrow), vec![0.0, 0.0, 6.0, 0.0]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].points, vec![1.0, 1.0]);
        assert_eq!(groups[0].direction, vec![0.0, 0.0, 6.0, 0.0]);
    }

    #[test]
    fn test_upsert_without_category_deletes() {
        let mut store = AnnotationStore::new();
        store.replace_all(&[square("a"), square("b")]);
        let groups = store.upsert_geometry(None, Some("a"), None, Vec::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind.as_deref(), Some("b"));

        // Deleting an unknown type changes nothing
        store.upsert_geometry(None, Some("zzz"), None, Vec::new());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_untyped_entries_are_addressed_by_position() {
        let mut store = AnnotationStore::new();
        store.upsert_geometry(None, None, Some(ShapeCategory::Polygon), vec![2.0, 2.0]);
        store.upsert_geometry(None, None, Some(ShapeCategory::Polygon), vec![3.0, 3.0]);
        assert_eq!(store.len(), 2);

        store.upsert_geometry(Some(1), None, Some(ShapeCategory::Arrow), vec![0.0, 0.0, 9.0, 0.0]);
        assert!(store.get(0).is_some_and(|g| g.direction.is_empty()));
        assert_eq!(store.get(1).map(|g| g.points.clone()), Some(vec![3.0, 3.0]));
        assert_eq!(store.first_unfinished(), Some(0));

        // Without a position an untyped delete has nothing to match
        store.upsert_geometry(None, None, None, Vec::new());
        assert_eq!(store.len(), 2);
        let groups = store.upsert_geometry(Some(0), None, None, Vec::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].points, vec![3.0, 3.0]);
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_completed_counter_saturates() {
        let mut store = AnnotationStore::new();
        store.unmark_completed();
        assert_eq!(store.count(), 0);
        store.mark_completed();
        assert_eq!(store.count(), 1);
    }
}
