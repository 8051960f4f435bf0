// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph read contract.
//!
//! The overlay engine never owns the scene graph. It reads it once per pass
//! through the [`SceneGraph`] capability and keeps its own per-node state in a
//! side table keyed by [`SceneGraph::Node`].
//!
//! A node exposes:
//!
//! - Topology: ordered [`children`](SceneGraph::children) (insertion order is
//!   paint order).
//! - Flags: [`is_visible`](SceneGraph::is_visible) and
//!   [`is_interactive`](SceneGraph::is_interactive).
//! - Accessibility metadata: [`AccessibleAttrs`].
//! - Geometry: a 2D world transform, an optional explicit hit area in local
//!   space, and a computed bounding rectangle in logical surface space.
//!
//! [`SceneStore`] is a reference implementation with generational handles,
//! usable by hosts that have no scene graph of their own and by tests.

mod id;
mod store;
mod traverse;

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use kurbo::{Affine, Rect};

pub use id::{INVALID, NodeId};
pub use store::{NodeFlags, SceneStore};
pub use traverse::Children;

/// Read-only access to a retained 2D scene graph.
pub trait SceneGraph {
    /// Node identity. Two equal values refer to the same node.
    type Node: Copy + Ord + fmt::Debug;

    /// Returns the direct children of `node` in paint order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node>;

    /// Returns whether the node (and therefore its subtree) is visible.
    fn is_visible(&self, node: Self::Node) -> bool;

    /// Returns whether the node receives pointer interaction.
    fn is_interactive(&self, node: Self::Node) -> bool;

    /// Returns the accessibility attributes of the node.
    fn accessibility(&self, node: Self::Node) -> &AccessibleAttrs;

    /// Returns the node's world transform (local space to logical surface space).
    fn world_transform(&self, node: Self::Node) -> Affine;

    /// Returns the node's explicit hit area in local space, if any.
    fn hit_area(&self, node: Self::Node) -> Option<Rect>;

    /// Returns the node's axis-aligned bounding rectangle in logical surface
    /// space.
    fn bounds(&self, node: Self::Node) -> Rect;
}

/// Accessibility metadata attached to a scene node by its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessibleAttrs {
    /// Whether the node is exposed to assistive technology.
    pub accessible: bool,
    /// Whether the walker descends into this node's children.
    ///
    /// `false` hides the subtree but not the node itself.
    pub accessible_children: bool,
    /// Title announced for the node.
    pub title: Option<String>,
    /// Hint announced for the node (mirrored into `aria-label`).
    pub hint: Option<String>,
    /// Element type of the proxy, `"button"` by default.
    pub kind: Cow<'static, str>,
    /// CSS `pointer-events` of the proxy, `"auto"` by default.
    pub pointer_events: Cow<'static, str>,
    /// Tab order of the proxy.
    pub tab_index: i32,
}

impl Default for AccessibleAttrs {
    fn default() -> Self {
        Self {
            accessible: false,
            accessible_children: true,
            title: None,
            hint: None,
            kind: Cow::Borrowed("button"),
            pointer_events: Cow::Borrowed("auto"),
            tab_index: 0,
        }
    }
}

impl AccessibleAttrs {
    /// Attributes for an accessible node with the given title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            accessible: true,
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Attributes for an accessible node with no title or hint.
    #[must_use]
    pub fn untitled(tab_index: i32) -> Self {
        Self {
            accessible: true,
            tab_index,
            ..Self::default()
        }
    }
}
