// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scrim.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomOverlay`]: `<button>` proxies inside an absolutely positioned
//!   container placed next to the canvas, the global `keydown` / `mousemove`
//!   listeners and the touch hook
//! - [`CanvasHost`]: a [`RenderHost`] over an `HtmlCanvasElement`
//! - [`detect_quirks`]: [`HostQuirks`] from `navigator.userAgent`
//!
//! DOM listeners only queue events. Drain them once per animation frame,
//! before the post-render update:
//!
//! ```rust,ignore
//! engine.pump(&mut interaction, &mut tracer);
//! renderer.render(&scene);
//! if engine.host().post_render_subscribed() {
//!     engine.update(&scene, &mut tracer);
//! }
//! ```
//!
//! [`RenderHost`]: scrim_core::backend::RenderHost

#![no_std]

extern crate alloc;

mod host;
mod overlay;

pub use host::CanvasHost;
pub use overlay::{DomOverlay, DomProxy};

use scrim_core::config::HostQuirks;
use wasm_bindgen::prelude::*;
use web_sys::Window;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;
}

/// Derives [`HostQuirks`] from the window's user agent.
///
/// Falls back to the defaults when the user agent cannot be read.
#[must_use]
pub fn detect_quirks(window: &Window) -> HostQuirks {
    window
        .navigator()
        .user_agent()
        .map(|ua| HostQuirks::from_user_agent(&ua))
        .unwrap_or_default()
}

/// Formats a CSS pixel length.
pub(crate) fn px(value: f64) -> alloc::string::String {
    alloc::format!("{value}px")
}
