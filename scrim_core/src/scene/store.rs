// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays scene storage with allocation, topology, and property management.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use super::id::{INVALID, NodeId};
use super::traverse::Children;
use super::{AccessibleAttrs, SceneGraph};

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node and its subtree are visible.
    pub visible: bool,
    /// Whether the node receives pointer interaction.
    pub interactive: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            visible: true,
            interactive: false,
        }
    }
}

/// Struct-of-arrays storage for a retained 2D scene.
///
/// Nodes are addressed by [`NodeId`] handles. Destroyed nodes are recycled via
/// a free list, and generation counters prevent stale handle access.
///
/// World transforms are not cached: [`world_transform`](Self::world_transform)
/// composes ancestor transforms on every call, so mutations are visible to the
/// next reader without an evaluation step.
#[derive(Debug)]
pub struct SceneStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties --
    pub(crate) local_transform: Vec<Affine>,
    pub(crate) local_bounds: Vec<Rect>,
    pub(crate) hit_area: Vec<Option<Rect>>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) accessibility: Vec<AccessibleAttrs>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            local_transform: Vec::new(),
            local_bounds: Vec::new(),
            hit_area: Vec::new(),
            flags: Vec::new(),
            accessibility: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a new node and returns its handle.
    ///
    /// The node starts visible, non-interactive and not accessible, with an
    /// identity transform, empty bounds, no hit area and no parent.
    pub fn create_node(&mut self) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.local_transform[i] = Affine::IDENTITY;
            self.local_bounds[i] = Rect::ZERO;
            self.hit_area[i] = None;
            self.flags[i] = NodeFlags::default();
            self.accessibility[i] = AccessibleAttrs::default();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.local_transform.push(Affine::IDENTITY);
            self.local_bounds.push(Rect::ZERO);
            self.hit_area.push(None);
            self.flags.push(NodeFlags::default());
            self.accessibility.push(AccessibleAttrs::default());
            self.generation.push(0);
            idx
        };

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last (topmost) child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] != INVALID,
            "node has no parent"
        );
        self.unlink_from_parent(child.idx);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(NodeId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    // -- Property getters --

    /// Returns the local transform of a node.
    #[must_use]
    pub fn local_transform(&self, id: NodeId) -> Affine {
        self.validate(id);
        self.local_transform[id.idx as usize]
    }

    /// Returns the local content bounds of a node.
    #[must_use]
    pub fn local_bounds(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.local_bounds[id.idx as usize]
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the product of all ancestor transforms and the node's own.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Affine {
        self.validate(id);
        let mut world = self.local_transform[id.idx as usize];
        let mut p = self.parent[id.idx as usize];
        while p != INVALID {
            world = self.local_transform[p as usize] * world;
            p = self.parent[p as usize];
        }
        world
    }

    // -- Mutation API --

    /// Sets the local transform of a node.
    pub fn set_transform(&mut self, id: NodeId, transform: Affine) {
        self.validate(id);
        self.local_transform[id.idx as usize] = transform;
    }

    /// Sets the local content bounds of a node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        self.validate(id);
        self.local_bounds[id.idx as usize] = bounds;
    }

    /// Sets or clears the explicit hit area of a node (local space).
    pub fn set_hit_area(&mut self, id: NodeId, hit_area: Option<Rect>) {
        self.validate(id);
        self.hit_area[id.idx as usize] = hit_area;
    }

    /// Sets the flags of a node.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
    }

    /// Sets the visibility of a node.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.validate(id);
        self.flags[id.idx as usize].visible = visible;
    }

    /// Sets whether a node receives pointer interaction.
    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) {
        self.validate(id);
        self.flags[id.idx as usize].interactive = interactive;
    }

    /// Replaces the accessibility attributes of a node.
    pub fn set_accessibility(&mut self, id: NodeId, attrs: AccessibleAttrs) {
        self.validate(id);
        self.accessibility[id.idx as usize] = attrs;
    }

    /// Returns mutable access to the accessibility attributes of a node.
    pub fn accessibility_mut(&mut self, id: NodeId) -> &mut AccessibleAttrs {
        self.validate(id);
        &mut self.accessibility[id.idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

impl SceneGraph for SceneStore {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        Self::children(self, node)
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.flags(node).visible
    }

    fn is_interactive(&self, node: NodeId) -> bool {
        self.flags(node).interactive
    }

    fn accessibility(&self, node: NodeId) -> &AccessibleAttrs {
        self.validate(node);
        &self.accessibility[node.idx as usize]
    }

    fn world_transform(&self, node: NodeId) -> Affine {
        Self::world_transform(self, node)
    }

    fn hit_area(&self, node: NodeId) -> Option<Rect> {
        self.validate(node);
        self.hit_area[node.idx as usize]
    }

    /// Bounding box of the node's own content under its world transform.
    fn bounds(&self, node: NodeId) -> Rect {
        Self::world_transform(self, node).transform_rect_bbox(self.local_bounds(node))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut store = SceneStore::new();
        let id = store.create_node();
        assert!(store.is_alive(id));
        store.destroy_node(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = SceneStore::new();
        let id1 = store.create_node();
        store.destroy_node(id1);
        let id2 = store.create_node();
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn reused_slot_is_reset() {
        let mut store = SceneStore::new();
        let id1 = store.create_node();
        store.set_accessibility(id1, AccessibleAttrs::titled("old"));
        store.set_interactive(id1, true);
        store.destroy_node(id1);

        let id2 = store.create_node();
        assert_eq!(*SceneGraph::accessibility(&store, id2), AccessibleAttrs::default());
        assert_eq!(store.flags(id2), NodeFlags::default());
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut store = SceneStore::new();
        let parent = store.create_node();
        let a = store.create_node();
        let b = store.create_node();
        let c = store.create_node();

        store.add_child(parent, a);
        store.add_child(parent, c);
        store.insert_before(b, c);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
        assert_eq!(store.parent(b), Some(parent));
    }

    #[test]
    fn remove_from_parent_unlinks() {
        let mut store = SceneStore::new();
        let parent = store.create_node();
        let a = store.create_node();
        let b = store.create_node();
        store.add_child(parent, a);
        store.add_child(parent, b);

        store.remove_from_parent(a);
        assert_eq!(store.parent(a), None);
        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![b]);
    }

    #[test]
    fn world_transform_composes_ancestors() {
        let mut store = SceneStore::new();
        let root = store.create_node();
        let child = store.create_node();
        store.add_child(root, child);
        store.set_transform(root, Affine::translate((10.0, 0.0)));
        store.set_transform(child, Affine::scale(2.0));

        let world = store.world_transform(child);
        assert_eq!(world, Affine::translate((10.0, 0.0)) * Affine::scale(2.0));
    }

    #[test]
    fn bounds_apply_world_transform() {
        let mut store = SceneStore::new();
        let root = store.create_node();
        let child = store.create_node();
        store.add_child(root, child);
        store.set_transform(root, Affine::translate((5.0, 7.0)));
        store.set_transform(child, Affine::scale(2.0));
        store.set_bounds(child, Rect::new(0.0, 0.0, 10.0, 20.0));

        let bounds = SceneGraph::bounds(&store, child);
        assert_eq!(bounds, Rect::new(5.0, 7.0, 25.0, 47.0));
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut store = SceneStore::new();
        let parent = store.create_node();
        let child = store.create_node();
        store.add_child(parent, child);
        store.destroy_node(parent);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_transform() {
        let mut store = SceneStore::new();
        let id = store.create_node();
        store.destroy_node(id);
        let _ = store.world_transform(id);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_parenting_panics() {
        let mut store = SceneStore::new();
        let p1 = store.create_node();
        let p2 = store.create_node();
        let child = store.create_node();
        store.add_child(p1, child);
        store.add_child(p2, child);
    }
}
