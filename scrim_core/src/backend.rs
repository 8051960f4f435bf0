// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts with the render host and the native overlay tree.
//!
//! Scrim splits platform-specific work out of the engine:
//!
//! - **Render host** implements [`RenderHost`]: post-render subscription,
//!   the currently rendered root, and the displayed vs logical surface size.
//!
//! - **Overlay backend** implements [`OverlayBackend`]: it creates native
//!   focusable proxy elements, mirrors geometry and metadata into them,
//!   registers global keyboard / pointer listeners and the touch hook, and
//!   queues the [`OverlayEvent`]s those listeners produce.
//!
//! # Event flow
//!
//! Native listeners never call into the engine. They enqueue an
//! [`OverlayEvent`] and the owner drains the queue with
//! [`OverlayEngine::pump`](crate::engine::OverlayEngine::pump), so an event
//! raised while a reconciliation pass mutates the native tree (a blur caused
//! by detaching a focused proxy, say) is handled after the pass.
//!
//! ```rust,ignore
//! fn on_frame() {
//!     renderer.render(&scene);
//!     if host.post_render_subscribed() {
//!         engine.update(&scene, &mut tracer);
//!     }
//! }
//!
//! fn on_overlay_input() {
//!     engine.pump(&mut interaction, &mut tracer);
//! }
//! ```

use core::fmt;

use kurbo::{Rect, Size, Vec2};

/// Identifies a proxy element owned by the engine's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProxyId(pub u32);

/// `aria-live` announcement mode of a proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiveMode {
    /// Changes are not announced.
    Off,
    /// Changes are announced when the user is idle.
    Polite,
    /// Changes are announced immediately.
    Assertive,
}

impl LiveMode {
    /// Returns the attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// `aria-relevant` value of a proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiveRelevant {
    /// Only node additions are announced.
    Additions,
    /// Text changes are announced.
    Text,
}

impl LiveRelevant {
    /// Returns the attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additions => "additions",
            Self::Text => "text",
        }
    }
}

/// Construction-time styling of a proxy element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProxyStyle {
    /// Fill the proxy so it can be seen.
    pub debug: bool,
    /// Initial `aria-live` mode.
    pub live_mode: LiveMode,
    /// `aria-relevant` value.
    pub relevant: LiveRelevant,
}

/// Initial edge length of a freshly constructed proxy, in CSS pixels.
pub const PROXY_TOUCH_SIZE: f64 = 100.0;

/// Stacking order of the overlay container and its proxies.
pub const OVERLAY_Z_INDEX: i32 = 2;

/// Edge length of the touch hook element, in CSS pixels.
pub const TOUCH_HOOK_SIZE: f64 = 1.0;

/// Offscreen position of the touch hook element, in CSS pixels.
pub const TOUCH_HOOK_POSITION: f64 = -1000.0;

/// Title of the touch hook element.
pub const TOUCH_HOOK_TITLE: &str = "select to enable accessibility for this content";

/// A global listener the engine can register with the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    /// Keyboard key-down on the host window.
    KeyDown,
    /// Pointer movement on the host document (capture phase).
    PointerMove,
}

/// A key reported by the key-down listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The Tab key.
    Tab,
    /// Any other key.
    Other,
}

/// A native interaction on a proxy element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProxyEvent {
    /// The proxy was activated (click, Enter/Space, assistive double-tap).
    Click,
    /// The proxy received focus.
    Focus,
    /// The proxy lost focus.
    Blur,
}

/// An input observed by the native overlay tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayEvent {
    /// A key went down while the key-down listener was registered.
    KeyDown(Key),
    /// The pointer moved while the pointer-move listener was registered.
    PointerMove(Vec2),
    /// The touch hook element received focus.
    TouchHookFocus,
    /// A proxy element was interacted with.
    Proxy(ProxyId, ProxyEvent),
}

/// Read access to the renderer that draws the scene.
pub trait RenderHost {
    /// Node identity of the rendered scene.
    type Node: Copy + Ord + fmt::Debug;

    /// Starts delivering post-render notifications to the engine's owner.
    fn subscribe_post_render(&mut self);

    /// Stops delivering post-render notifications.
    fn unsubscribe_post_render(&mut self);

    /// Returns the root of the most recently rendered subtree.
    fn current_render_root(&self) -> Option<Self::Node>;

    /// Returns `false` for offscreen or texture-only render passes.
    fn is_rendering_to_visible_surface(&self) -> bool;

    /// Returns the on-screen rectangle of the render surface, in viewport pixels.
    fn displayed_surface_rect(&self) -> Rect;

    /// Returns the resolution of the render surface.
    fn logical_surface_size(&self) -> Size;

    /// Returns a monotonic timestamp in milliseconds.
    ///
    /// Only consulted when [`HostQuirks::update_interval_ms`] is set.
    ///
    /// [`HostQuirks::update_interval_ms`]: crate::config::HostQuirks::update_interval_ms
    fn now_ms(&self) -> f64 {
        0.0
    }
}

/// The native tree that hosts the proxy elements.
///
/// Mutation methods are infallible: a backend that cannot apply a property
/// leaves the element as it was.
pub trait OverlayBackend {
    /// A native focusable element.
    type Element;

    /// Constructs a detached proxy element with `style` and installs its
    /// click, focus and blur listeners, which report events for `id`.
    ///
    /// Returns `None` if the native tree refuses to construct the element;
    /// the node is then left unexposed and retried on the next pass.
    fn create_proxy(&mut self, id: ProxyId, style: &ProxyStyle) -> Option<Self::Element>;

    /// Releases the native resources of a proxy (listeners included).
    fn destroy_proxy(&mut self, element: Self::Element);

    /// Appends a proxy to the overlay container.
    fn attach_proxy(&mut self, element: &Self::Element);

    /// Removes a proxy from the overlay container.
    fn detach_proxy(&mut self, element: &Self::Element);

    /// Positions and sizes a proxy, in viewport pixels relative to the container.
    fn set_proxy_rect(&mut self, element: &Self::Element, rect: Rect);

    /// Sets the proxy's title.
    fn set_title(&mut self, element: &Self::Element, title: &str);

    /// Sets the proxy's `aria-label`.
    fn set_label(&mut self, element: &Self::Element, label: &str);

    /// Removes the proxy's `aria-label`.
    fn remove_label(&mut self, element: &Self::Element);

    /// Sets the proxy's tab index.
    fn set_tab_index(&mut self, element: &Self::Element, tab_index: i32);

    /// Sets the proxy's element type.
    fn set_kind(&mut self, element: &Self::Element, kind: &str);

    /// Sets the proxy's `pointer-events`.
    fn set_pointer_events(&mut self, element: &Self::Element, pointer_events: &str);

    /// Sets the proxy's `aria-live` mode.
    fn set_live_mode(&mut self, element: &Self::Element, mode: LiveMode);

    /// Replaces the visible debug text of a proxy.
    fn set_debug_text(&mut self, element: &Self::Element, text: &str);

    /// Inserts the overlay container next to the render surface.
    fn attach_container(&mut self);

    /// Removes the overlay container from the native tree.
    fn detach_container(&mut self);

    /// Positions the overlay container over the displayed render surface.
    fn set_container_rect(&mut self, rect: Rect);

    /// Registers a global listener. Registering twice is a no-op.
    fn listen(&mut self, listener: GlobalListener);

    /// Unregisters a global listener. Unregistering twice is a no-op.
    fn unlisten(&mut self, listener: GlobalListener);

    /// Inserts the offscreen touch hook element.
    fn insert_touch_hook(&mut self);

    /// Removes the touch hook element and its listener.
    fn remove_touch_hook(&mut self);

    /// Takes the oldest queued input, if any.
    fn poll_event(&mut self) -> Option<OverlayEvent>;
}
