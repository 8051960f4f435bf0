// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proxy placement: scene geometry to viewport pixels, plus label mirroring.
//!
//! A proxy rectangle is derived in one of two ways:
//!
//! - **Hit-area mode**: the node carries an explicit local hit area. Its
//!   origin is mapped through the translation and diagonal terms of the world
//!   transform only (rotation and skew are ignored) and the result is not
//!   clamped.
//! - **Bounds mode**: the node's world bounding box is clamped to the logical
//!   surface, since screen readers get confused by focus rectangles outside
//!   the visible canvas.
//!
//! Either rectangle is then scaled from logical surface pixels to displayed
//! pixels by [`ViewportScale`]. A result with no positive area collapses to an
//! empty rectangle at its origin.

use alloc::format;
use alloc::string::String;

use kurbo::{Affine, Rect, Size};

use crate::backend::OverlayBackend;
use crate::pool::Proxy;
use crate::scene::{AccessibleAttrs, SceneGraph};

/// Ratio between displayed surface size and logical surface size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportScale {
    /// Horizontal scale.
    pub sx: f64,
    /// Vertical scale.
    pub sy: f64,
}

impl ViewportScale {
    /// The identity scale.
    pub const IDENTITY: Self = Self { sx: 1.0, sy: 1.0 };

    /// Computes the scale that maps `logical` onto `displayed`.
    ///
    /// A zero logical dimension yields a zero scale on that axis.
    #[must_use]
    pub fn new(displayed: Size, logical: Size) -> Self {
        let ratio = |shown: f64, surface: f64| {
            if surface == 0.0 { 0.0 } else { shown / surface }
        };
        Self {
            sx: ratio(displayed.width, logical.width),
            sy: ratio(displayed.height, logical.height),
        }
    }

    /// Scales a logical-space rectangle into displayed pixels.
    #[must_use]
    pub fn apply(self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 * self.sx,
            rect.y0 * self.sy,
            rect.x1 * self.sx,
            rect.y1 * self.sy,
        )
    }
}

/// The surface a pass is placing proxies onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical (render resolution) size of the surface.
    pub surface: Size,
    /// Logical to displayed scale.
    pub scale: ViewportScale,
}

impl Viewport {
    /// Builds a viewport from the displayed rectangle and the logical size.
    #[must_use]
    pub fn new(displayed: Rect, logical: Size) -> Self {
        Self {
            surface: logical,
            scale: ViewportScale::new(displayed.size(), logical),
        }
    }
}

/// Maps a local hit area through the translation and diagonal of `world`.
///
/// The size is not normalized: a mirrored axis yields a negative extent.
#[must_use]
pub fn hit_area_rect(world: Affine, hit_area: Rect) -> Rect {
    let [a, _b, _c, d, tx, ty] = world.as_coeffs();
    let x = tx + hit_area.x0 * a;
    let y = ty + hit_area.y0 * d;
    Rect::new(
        x,
        y,
        x + hit_area.width() * a,
        y + hit_area.height() * d,
    )
}

/// Clamps `bounds` so it never extends outside `[0, width] × [0, height]`.
#[must_use]
pub fn clamp_to_surface(bounds: Rect, surface: Size) -> Rect {
    let mut x = bounds.x0;
    let mut y = bounds.y0;
    let mut width = bounds.width();
    let mut height = bounds.height();

    if x < 0.0 {
        width += x;
        x = 0.0;
    }
    if y < 0.0 {
        height += y;
        y = 0.0;
    }
    if x + width > surface.width {
        width = surface.width - x;
    }
    if y + height > surface.height {
        height = surface.height - y;
    }

    Rect::new(x, y, x + width, y + height)
}

/// Computes the displayed-pixel rectangle of `node`'s proxy.
#[must_use]
pub fn proxy_rect<S: SceneGraph>(scene: &S, node: S::Node, viewport: &Viewport) -> Rect {
    let logical = match scene.hit_area(node) {
        Some(hit_area) => hit_area_rect(scene.world_transform(node), hit_area),
        None => clamp_to_surface(scene.bounds(node), viewport.surface),
    };
    let rect = viewport.scale.apply(logical);
    if rect.width() > 0.0 && rect.height() > 0.0 {
        rect
    } else {
        Rect::from_origin_size(rect.origin(), Size::ZERO)
    }
}

/// Title given to nodes with neither a title nor a hint.
#[must_use]
pub fn fallback_title(tab_index: i32) -> String {
    format!("node {tab_index}")
}

/// Repositions and relabels a bound proxy.
pub(crate) fn place<B, S>(
    backend: &mut B,
    scene: &S,
    node: S::Node,
    proxy: &mut Proxy<B::Element, S::Node>,
    viewport: &Viewport,
    debug: bool,
) where
    B: OverlayBackend,
    S: SceneGraph,
{
    backend.set_proxy_rect(&proxy.element, proxy_rect(scene, node, viewport));

    let attrs = scene.accessibility(node);
    let title_changed = sync_title(backend, proxy, attrs);
    if let Some(hint) = &attrs.hint
        && proxy.label.as_deref() != Some(hint.as_str())
    {
        backend.set_label(&proxy.element, hint);
        proxy.label = Some(hint.clone());
    }

    if title_changed || proxy.tab_index != Some(attrs.tab_index) {
        backend.set_tab_index(&proxy.element, attrs.tab_index);
        proxy.tab_index = Some(attrs.tab_index);
        if debug {
            backend.set_debug_text(&proxy.element, &debug_text(attrs, proxy));
        }
    }
}

/// Writes every mirrored attribute of a freshly bound proxy.
///
/// Recycled proxies may carry a previous node's title or label; those are
/// cleared when the new node has none.
pub(crate) fn mirror_initial<B, N>(
    backend: &mut B,
    proxy: &mut Proxy<B::Element, N>,
    attrs: &AccessibleAttrs,
    debug: bool,
) where
    B: OverlayBackend,
{
    backend.set_pointer_events(&proxy.element, &attrs.pointer_events);
    backend.set_kind(&proxy.element, &attrs.kind);

    sync_title(backend, proxy, attrs);
    if attrs.title.is_none() && attrs.hint.is_some() && proxy.title.take().is_some() {
        backend.set_title(&proxy.element, "");
    }

    match &attrs.hint {
        Some(hint) => {
            if proxy.label.as_deref() != Some(hint.as_str()) {
                backend.set_label(&proxy.element, hint);
                proxy.label = Some(hint.clone());
            }
        }
        None => {
            if proxy.label.take().is_some() {
                backend.remove_label(&proxy.element);
            }
        }
    }

    backend.set_tab_index(&proxy.element, attrs.tab_index);
    proxy.tab_index = Some(attrs.tab_index);

    if debug {
        backend.set_debug_text(&proxy.element, &debug_text(attrs, proxy));
    }
}

/// Mirrors the title (or the fallback title) when it differs from the last
/// written value. Returns whether a write happened.
fn sync_title<B, N>(
    backend: &mut B,
    proxy: &mut Proxy<B::Element, N>,
    attrs: &AccessibleAttrs,
) -> bool
where
    B: OverlayBackend,
{
    let wanted = match (&attrs.title, &attrs.hint) {
        (Some(title), _) => title.clone(),
        (None, None) => fallback_title(attrs.tab_index),
        (None, Some(_)) => return false,
    };
    if proxy.title.as_deref() == Some(wanted.as_str()) {
        return false;
    }
    backend.set_title(&proxy.element, &wanted);
    proxy.title = Some(wanted);
    true
}

fn debug_text<E, N>(attrs: &AccessibleAttrs, proxy: &Proxy<E, N>) -> String {
    format!(
        "type: {}\ntitle: {}\ntabIndex: {}",
        attrs.kind,
        proxy.title.as_deref().unwrap_or(""),
        attrs.tab_index,
    )
}
