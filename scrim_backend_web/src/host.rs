// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas-backed render host.

use kurbo::{Rect, Size};
use scrim_core::backend::RenderHost;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlCanvasElement};

use crate::performance_now;

/// A [`RenderHost`] for a renderer drawing into an `HtmlCanvasElement`.
///
/// The canvas itself knows nothing about the renderer, so the owner reports
/// what was rendered: call [`set_render_root`](Self::set_render_root) after
/// each render, and [`set_rendering_to_visible_surface`] around offscreen
/// passes. Whether the engine wants post-render updates is exposed through
/// [`post_render_subscribed`](Self::post_render_subscribed).
///
/// [`set_rendering_to_visible_surface`]: Self::set_rendering_to_visible_surface
pub struct CanvasHost<N> {
    canvas: HtmlCanvasElement,
    root: Option<N>,
    visible_surface: bool,
    subscribed: bool,
}

impl<N> core::fmt::Debug for CanvasHost<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasHost")
            .field("canvas", &"HtmlCanvasElement")
            .field("has_root", &self.root.is_some())
            .field("visible_surface", &self.visible_surface)
            .field("subscribed", &self.subscribed)
            .finish()
    }
}

impl<N> CanvasHost<N> {
    /// Creates a host for `canvas`.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            root: None,
            visible_surface: true,
            subscribed: false,
        }
    }

    /// Creates a host for the canvas with the given element id.
    ///
    /// # Errors
    ///
    /// Fails if there is no such element or it is not a canvas.
    pub fn from_element_id(document: &Document, id: &str) -> Result<Self, JsValue> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str("canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        Ok(Self::new(canvas))
    }

    /// Returns the canvas.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Records the root of the subtree that was just rendered.
    pub fn set_render_root(&mut self, root: Option<N>) {
        self.root = root;
    }

    /// Records whether the last render targeted the canvas itself.
    pub fn set_rendering_to_visible_surface(&mut self, visible: bool) {
        self.visible_surface = visible;
    }

    /// Returns whether the engine wants an update after each render.
    #[must_use]
    pub fn post_render_subscribed(&self) -> bool {
        self.subscribed
    }
}

impl<N: Copy + Ord + core::fmt::Debug> RenderHost for CanvasHost<N> {
    type Node = N;

    fn subscribe_post_render(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe_post_render(&mut self) {
        self.subscribed = false;
    }

    fn current_render_root(&self) -> Option<N> {
        self.root
    }

    fn is_rendering_to_visible_surface(&self) -> bool {
        self.visible_surface
    }

    fn displayed_surface_rect(&self) -> Rect {
        let r = self.canvas.get_bounding_client_rect();
        Rect::from_origin_size((r.x(), r.y()), (r.width(), r.height()))
    }

    fn logical_surface_size(&self) -> Size {
        Size::new(f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn now_ms(&self) -> f64 {
        performance_now()
    }
}
