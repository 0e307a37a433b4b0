//! Editor-side record of what the view is currently rendering.
//!
//! Groups live in an arena indexed by `GroupId`; handles live in a side table
//! keyed by `HandleId` and point back at their group, category and vertex index.
//! Nothing here depends on the identity or lifetime of the view's own nodes.

use std::collections::BTreeMap;

use crate::geometry::point_at;
use crate::model::{GroupId, HandleId, ShapeCategory};

/// Rendered geometry of one group, in absolute surface coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    /// Type tag the group will be committed under
    pub kind: Option<String>,
    /// Position of the committed entry in the store, once there is one
    pub entry: Option<usize>,
    pub polygon: Vec<f32>,
    pub arrow: Vec<f32>,
    /// Polygon has been closed and is rendered filled
    pub closed: bool,
    /// Visual offset applied by an in-flight group drag
    pub offset: (f32, f32),
}

impl GroupNode {
    /// Get the rendered coordinates for one half of the group.
    pub fn shape(&self, category: ShapeCategory) -> &[f32] {
        match category {
            ShapeCategory::Polygon => &self.polygon,
            ShapeCategory::Arrow => &self.arrow,
        }
    }

    fn shape_mut(&mut self, category: ShapeCategory) -> &mut Vec<f32> {
        match category {
            ShapeCategory::Polygon => &mut self.polygon,
            ShapeCategory::Arrow => &mut self.arrow,
        }
    }
}

/// A control point bound to one vertex of a group's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub group: GroupId,
    pub category: ShapeCategory,
    pub index: usize,
}

/// Arena of rendered groups plus the handle side table.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    groups: Vec<Option<GroupNode>>,
    handles: BTreeMap<HandleId, Handle>,
    next_handle: HandleId,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new empty group.
    pub fn insert_group(&mut self, kind: Option<String>) -> GroupId {
        let id = self.groups.len() as GroupId;
        self.groups.push(Some(GroupNode {
            kind,
            ..GroupNode::default()
        }));
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupNode> {
        self.groups.get(id as usize).and_then(Option::as_ref)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut GroupNode> {
        self.groups.get_mut(id as usize).and_then(Option::as_mut)
    }

    /// Check whether a group is alive.
    pub fn contains(&self, id: GroupId) -> bool {
        self.group(id).is_some()
    }

    /// Ids of all live groups, in creation order.
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_some())
            .map(|(i, _)| i as GroupId)
            .collect()
    }

    /// Find the live group rendering the store entry at `entry`.
    pub fn find_by_entry(&self, entry: usize) -> Option<GroupId> {
        self.group_ids()
            .into_iter()
            .find(|&id| self.group(id).is_some_and(|g| g.entry == Some(entry)))
    }

    /// The store entry at `entry` was removed: later entries move up by one.
    pub fn entry_removed(&mut self, entry: usize) {
        for node in self.groups.iter_mut().flatten() {
            match node.entry {
                Some(i) if i == entry => node.entry = None,
                Some(i) if i > entry => node.entry = Some(i - 1),
                _ => {}
            }
        }
    }

    /// Remove a group and every handle bound to it.
    pub fn remove_group(&mut self, id: GroupId) -> Option<GroupNode> {
        let node = self.groups.get_mut(id as usize)?.take()?;
        self.handles.retain(|_, h| h.group != id);
        Some(node)
    }

    /// Drop every group and handle. Ids are never reused.
    pub fn clear(&mut self) {
        for slot in &mut self.groups {
            *slot = None;
        }
        self.handles.clear();
    }

    /// Replace the rendered coordinates for one half of a group.
    pub fn set_shape(&mut self, id: GroupId, category: ShapeCategory, points: Vec<f32>) {
        if let Some(node) = self.group_mut(id) {
            *node.shape_mut(category) = points;
        }
    }

    /// Get the rendered coordinates for one half of a group.
    pub fn shape(&self, id: GroupId, category: ShapeCategory) -> &[f32] {
        self.group(id).map(|g| g.shape(category)).unwrap_or(&[])
    }

    /// Bind a new handle to a vertex.
    pub fn add_handle(&mut self, group: GroupId, category: ShapeCategory, index: usize) -> HandleId {
        let id = self.next_handle;
        self.next_handle += 1;
        self.handles.insert(id, Handle { group, category, index });
        id
    }

    pub fn handle(&self, id: HandleId) -> Option<Handle> {
        self.handles.get(&id).copied()
    }

    /// Absolute position of the vertex a handle is bound to.
    pub fn handle_position(&self, id: HandleId) -> Option<(f32, f32)> {
        let handle = self.handle(id)?;
        point_at(self.shape(handle.group, handle.category), handle.index)
    }

    /// Handles of one half of a group, ordered by vertex index.
    pub fn handles_of(&self, group: GroupId, category: ShapeCategory) -> Vec<(HandleId, usize)> {
        let mut found: Vec<(HandleId, usize)> = self
            .handles
            .iter()
            .filter(|(_, h)| h.group == group && h.category == category)
            .map(|(&id, h)| (id, h.index))
            .collect();
        found.sort_by_key(|&(_, index)| index);
        found
    }

    /// Remove the handles of one half of a group, returning their ids.
    pub fn remove_handles(&mut self, group: GroupId, category: ShapeCategory) -> Vec<HandleId> {
        let removed: Vec<HandleId> = self
            .handles_of(group, category)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        for id in &removed {
            self.handles.remove(id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_arena_ids_are_stable() {
        let mut scene = Scene::new();
        let a = scene.insert_group(Some("a".to_string()));
        let b = scene.insert_group(None);
        assert!(scene.remove_group(a).is_some());
        assert!(!scene.contains(a));
        assert!(scene.contains(b));

        // Removed slots are not reused
        let c = scene.insert_group(None);
        assert_ne!(c, a);
        assert_eq!(scene.group_ids(), vec![b, c]);
    }

    #[test]
    fn test_handle_side_table() {
        let mut scene = Scene::new();
        let g = scene.insert_group(Some("a".to_string()));
        scene.set_shape(g, ShapeCategory::Polygon, vec![0.0, 0.0, 10.0, 0.0]);
        scene.set_shape(g, ShapeCategory::Arrow, vec![1.0, 1.0, 9.0, 1.0]);
        let h0 = scene.add_handle(g, ShapeCategory::Polygon, 0);
        let h1 = scene.add_handle(g, ShapeCategory::Polygon, 1);
        let a1 = scene.add_handle(g, ShapeCategory::Arrow, 1);

        assert_eq!(scene.handle_position(h1), Some((10.0, 0.0)));
        assert_eq!(scene.handle_position(a1), Some((9.0, 1.0)));
        assert_eq!(scene.handles_of(g, ShapeCategory::Polygon), vec![(h0, 0), (h1, 1)]);

        assert_eq!(scene.remove_handles(g, ShapeCategory::Arrow), vec![a1]);
        assert!(scene.handle(a1).is_none());
        assert!(scene.handle(h0).is_some());

        scene.remove_group(g);
        assert!(scene.handle(h0).is_none());
    }

    #[test]
    fn test_entries_follow_store_removal() {
        let mut scene = Scene::new();
        let ids: Vec<GroupId> = (0..3).map(|_| scene.insert_group(None)).collect();
        for (entry, &id) in ids.iter().enumerate() {
            if let Some(node) = scene.group_mut(id) {
                node.entry = Some(entry);
            }
        }
        assert_eq!(scene.find_by_entry(1), Some(ids[1]));

        scene.entry_removed(1);
        assert_eq!(scene.group(ids[0]).and_then(|g| g.entry), Some(0));
        assert_eq!(scene.group(ids[1]).and_then(|g| g.entry), None);
        assert_eq!(scene.find_by_entry(1), Some(ids[2]));
    }
}
