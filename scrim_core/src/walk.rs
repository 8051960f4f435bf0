// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate discovery over the scene graph.
//!
//! The walk is depth-first pre-order over [`SceneGraph::children`], so
//! candidates are reported in paint order. It holds no state between passes:
//! the candidate set is re-derived from the live scene every time.
//!
//! - An invisible node is skipped together with its whole subtree.
//! - `accessible_children == false` stops descent below a node, but the node
//!   itself is still considered.
//! - A node is a candidate iff it is accessible and interactive.

use alloc::vec::Vec;

use crate::scene::SceneGraph;

/// Reports every candidate below (and including) `root` to `visit`.
pub fn walk<S, F>(scene: &S, root: S::Node, visit: &mut F)
where
    S: SceneGraph,
    F: FnMut(S::Node),
{
    if !scene.is_visible(root) {
        return;
    }

    let attrs = scene.accessibility(root);
    if attrs.accessible && scene.is_interactive(root) {
        visit(root);
    }
    if !attrs.accessible_children {
        return;
    }

    for child in scene.children(root) {
        walk(scene, child, visit);
    }
}

/// Collects the candidates below `root` into `out`, in discovery order.
///
/// `out` is cleared first so a buffer can be reused across passes.
pub fn collect_candidates<S: SceneGraph>(scene: &S, root: S::Node, out: &mut Vec<S::Node>) {
    out.clear();
    walk(scene, root, &mut |node| out.push(node));
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::scene::{AccessibleAttrs, NodeFlags, NodeId, SceneStore};

    fn button(scene: &mut SceneStore, parent: Option<NodeId>, title: &str) -> NodeId {
        let node = scene.create_node();
        scene.set_accessibility(node, AccessibleAttrs::titled(title));
        scene.set_interactive(node, true);
        if let Some(parent) = parent {
            scene.add_child(parent, node);
        }
        node
    }

    fn candidates(scene: &SceneStore, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_candidates(scene, root, &mut out);
        out
    }

    #[test]
    fn pre_order_discovery() {
        let mut scene = SceneStore::new();
        let root = scene.create_node();
        let a = button(&mut scene, Some(root), "a");
        let a1 = button(&mut scene, Some(a), "a1");
        let b = button(&mut scene, Some(root), "b");

        assert_eq!(candidates(&scene, root), vec![a, a1, b]);
    }

    #[test]
    fn invisible_node_hides_subtree() {
        let mut scene = SceneStore::new();
        let root = scene.create_node();
        let group = scene.create_node();
        scene.add_child(root, group);
        let inner = button(&mut scene, Some(group), "inner");
        let outer = button(&mut scene, Some(root), "outer");

        scene.set_visible(group, false);
        assert_eq!(candidates(&scene, root), vec![outer]);

        scene.set_visible(group, true);
        assert_eq!(candidates(&scene, root), vec![inner, outer]);
    }

    #[test]
    fn accessible_children_blocks_descent_only() {
        let mut scene = SceneStore::new();
        let root = scene.create_node();
        let panel = button(&mut scene, Some(root), "panel");
        let _inner = button(&mut scene, Some(panel), "inner");

        scene.accessibility_mut(panel).accessible_children = false;
        assert_eq!(candidates(&scene, root), vec![panel]);
    }

    #[test]
    fn candidate_requires_accessible_and_interactive() {
        let mut scene = SceneStore::new();
        let root = scene.create_node();

        let decorative = scene.create_node();
        scene.set_interactive(decorative, true);
        scene.add_child(root, decorative);

        let passive = scene.create_node();
        scene.set_accessibility(passive, AccessibleAttrs::titled("label"));
        scene.set_flags(
            passive,
            NodeFlags {
                visible: true,
                interactive: false,
            },
        );
        scene.add_child(root, passive);

        let active = button(&mut scene, Some(root), "go");

        assert_eq!(candidates(&scene, root), vec![active]);
    }

    #[test]
    fn root_itself_can_be_a_candidate() {
        let mut scene = SceneStore::new();
        let root = button(&mut scene, None, "root");
        assert_eq!(candidates(&scene, root), vec![root]);
    }

    #[test]
    fn buffer_is_reused() {
        let mut scene = SceneStore::new();
        let root = button(&mut scene, None, "root");
        let mut out = vec![root, root, root];
        collect_candidates(&scene, root, &mut out);
        assert_eq!(out, vec![root]);
    }
}
