// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory render host, overlay backend and interaction sink.
//!
//! These types back the engine's own tests and let applications exercise
//! their accessibility metadata without a browser. The overlay records every
//! mirrored attribute per proxy and offers simulators that enqueue the same
//! [`OverlayEvent`]s a native tree would, subject to the same preconditions:
//! a key press is only observed while the key-down listener is registered, a
//! proxy can only be clicked while it is in the attached container, and so on.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};

use crate::backend::{
    GlobalListener, Key, LiveMode, LiveRelevant, OverlayBackend, OverlayEvent, ProxyEvent,
    ProxyId, ProxyStyle, RenderHost,
};
use crate::bridge::{CanonicalEvent, InteractionSink};

/// Handle to a proxy held by [`HeadlessOverlay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadlessElement(pub ProxyId);

/// Everything written to one headless proxy.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    /// In the overlay container.
    pub attached: bool,
    /// Released by [`OverlayBackend::destroy_proxy`].
    pub destroyed: bool,
    /// Last rectangle, in viewport pixels.
    pub rect: Rect,
    /// Last title.
    pub title: Option<String>,
    /// Last `aria-label`.
    pub label: Option<String>,
    /// Last tab index.
    pub tab_index: Option<i32>,
    /// Last element type.
    pub kind: Option<String>,
    /// Last `pointer-events` value.
    pub pointer_events: Option<String>,
    /// Current `aria-live` mode.
    pub live_mode: LiveMode,
    /// `aria-relevant` value set at construction.
    pub relevant: LiveRelevant,
    /// Constructed with a visible fill.
    pub debug_fill: bool,
    /// Last debug text.
    pub debug_text: Option<String>,
    /// Number of title writes, redundant ones included.
    pub title_writes: usize,
}

/// An [`OverlayBackend`] that keeps the overlay tree in memory.
#[derive(Debug, Default)]
pub struct HeadlessOverlay {
    elements: BTreeMap<ProxyId, ElementState>,
    order: Vec<ProxyId>,
    container_attached: bool,
    container_rect: Option<Rect>,
    container_attach_count: usize,
    key_down: bool,
    pointer_move: bool,
    touch_hook: bool,
    queue: VecDeque<OverlayEvent>,
}

impl HeadlessOverlay {
    /// Creates an empty overlay with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded state of a proxy.
    #[must_use]
    pub fn element(&self, id: ProxyId) -> Option<&ElementState> {
        self.elements.get(&id)
    }

    /// Returns the attached proxies in container order.
    #[must_use]
    pub fn attached_proxies(&self) -> &[ProxyId] {
        &self.order
    }

    /// Returns whether the container is in the tree.
    #[must_use]
    pub fn is_container_attached(&self) -> bool {
        self.container_attached
    }

    /// Returns the last container rectangle.
    #[must_use]
    pub fn container_rect(&self) -> Option<Rect> {
        self.container_rect
    }

    /// Returns how many times the container was attached.
    #[must_use]
    pub fn container_attach_count(&self) -> usize {
        self.container_attach_count
    }

    /// Returns whether `listener` is registered.
    #[must_use]
    pub fn is_listening(&self, listener: GlobalListener) -> bool {
        match listener {
            GlobalListener::KeyDown => self.key_down,
            GlobalListener::PointerMove => self.pointer_move,
        }
    }

    /// Returns whether the touch hook is in the tree.
    #[must_use]
    pub fn has_touch_hook(&self) -> bool {
        self.touch_hook
    }

    /// Returns the number of queued events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Simulates a key press. Returns whether it was observed.
    pub fn press_key(&mut self, key: Key) -> bool {
        self.push_if(self.key_down, OverlayEvent::KeyDown(key))
    }

    /// Simulates pointer movement. Returns whether it was observed.
    pub fn move_pointer(&mut self, movement: Vec2) -> bool {
        self.push_if(self.pointer_move, OverlayEvent::PointerMove(movement))
    }

    /// Simulates focus landing on the touch hook. Returns whether it was
    /// observed.
    pub fn focus_touch_hook(&mut self) -> bool {
        self.push_if(self.touch_hook, OverlayEvent::TouchHookFocus)
    }

    /// Simulates activating a proxy. Returns whether it was observed.
    pub fn click(&mut self, id: ProxyId) -> bool {
        self.proxy_event(id, ProxyEvent::Click)
    }

    /// Simulates focusing a proxy. Returns whether it was observed.
    pub fn focus(&mut self, id: ProxyId) -> bool {
        self.proxy_event(id, ProxyEvent::Focus)
    }

    /// Simulates a proxy losing focus. Returns whether it was observed.
    pub fn blur(&mut self, id: ProxyId) -> bool {
        self.proxy_event(id, ProxyEvent::Blur)
    }

    fn proxy_event(&mut self, id: ProxyId, event: ProxyEvent) -> bool {
        let reachable = self.container_attached
            && self
                .elements
                .get(&id)
                .is_some_and(|e| e.attached && !e.destroyed);
        self.push_if(reachable, OverlayEvent::Proxy(id, event))
    }

    fn push_if(&mut self, observed: bool, event: OverlayEvent) -> bool {
        if observed {
            self.queue.push_back(event);
        }
        observed
    }

    fn state_mut(&mut self, element: &HeadlessElement) -> Option<&mut ElementState> {
        self.elements.get_mut(&element.0)
    }
}

impl OverlayBackend for HeadlessOverlay {
    type Element = HeadlessElement;

    fn create_proxy(&mut self, id: ProxyId, style: &ProxyStyle) -> Option<HeadlessElement> {
        self.elements.insert(
            id,
            ElementState {
                attached: false,
                destroyed: false,
                rect: Rect::ZERO,
                title: None,
                label: None,
                tab_index: None,
                kind: None,
                pointer_events: None,
                live_mode: style.live_mode,
                relevant: style.relevant,
                debug_fill: style.debug,
                debug_text: None,
                title_writes: 0,
            },
        );
        Some(HeadlessElement(id))
    }

    fn destroy_proxy(&mut self, element: HeadlessElement) {
        self.order.retain(|id| *id != element.0);
        if let Some(state) = self.state_mut(&element) {
            state.attached = false;
            state.destroyed = true;
        }
    }

    fn attach_proxy(&mut self, element: &HeadlessElement) {
        self.order.retain(|id| *id != element.0);
        self.order.push(element.0);
        if let Some(state) = self.state_mut(element) {
            state.attached = true;
        }
    }

    fn detach_proxy(&mut self, element: &HeadlessElement) {
        self.order.retain(|id| *id != element.0);
        if let Some(state) = self.state_mut(element) {
            state.attached = false;
        }
    }

    fn set_proxy_rect(&mut self, element: &HeadlessElement, rect: Rect) {
        if let Some(state) = self.state_mut(element) {
            state.rect = rect;
        }
    }

    fn set_title(&mut self, element: &HeadlessElement, title: &str) {
        if let Some(state) = self.state_mut(element) {
            state.title = Some(title.to_string());
            state.title_writes += 1;
        }
    }

    fn set_label(&mut self, element: &HeadlessElement, label: &str) {
        if let Some(state) = self.state_mut(element) {
            state.label = Some(label.to_string());
        }
    }

    fn remove_label(&mut self, element: &HeadlessElement) {
        if let Some(state) = self.state_mut(element) {
            state.label = None;
        }
    }

    fn set_tab_index(&mut self, element: &HeadlessElement, tab_index: i32) {
        if let Some(state) = self.state_mut(element) {
            state.tab_index = Some(tab_index);
        }
    }

    fn set_kind(&mut self, element: &HeadlessElement, kind: &str) {
        if let Some(state) = self.state_mut(element) {
            state.kind = Some(kind.to_string());
        }
    }

    fn set_pointer_events(&mut self, element: &HeadlessElement, pointer_events: &str) {
        if let Some(state) = self.state_mut(element) {
            state.pointer_events = Some(pointer_events.to_string());
        }
    }

    fn set_live_mode(&mut self, element: &HeadlessElement, mode: LiveMode) {
        if let Some(state) = self.state_mut(element) {
            state.live_mode = mode;
        }
    }

    fn set_debug_text(&mut self, element: &HeadlessElement, text: &str) {
        if let Some(state) = self.state_mut(element) {
            state.debug_text = Some(text.to_string());
        }
    }

    fn attach_container(&mut self) {
        if !self.container_attached {
            self.container_attached = true;
            self.container_attach_count += 1;
        }
    }

    fn detach_container(&mut self) {
        self.container_attached = false;
    }

    fn set_container_rect(&mut self, rect: Rect) {
        self.container_rect = Some(rect);
    }

    fn listen(&mut self, listener: GlobalListener) {
        match listener {
            GlobalListener::KeyDown => self.key_down = true,
            GlobalListener::PointerMove => self.pointer_move = true,
        }
    }

    fn unlisten(&mut self, listener: GlobalListener) {
        match listener {
            GlobalListener::KeyDown => self.key_down = false,
            GlobalListener::PointerMove => self.pointer_move = false,
        }
    }

    fn insert_touch_hook(&mut self) {
        self.touch_hook = true;
    }

    fn remove_touch_hook(&mut self) {
        self.touch_hook = false;
    }

    fn poll_event(&mut self) -> Option<OverlayEvent> {
        self.queue.pop_front()
    }
}

/// A [`RenderHost`] whose every answer is a public field.
#[derive(Clone, Debug)]
pub struct HeadlessHost<N> {
    /// Root of the last rendered subtree.
    pub root: Option<N>,
    /// Whether the last render targeted the visible surface.
    pub visible_surface: bool,
    /// On-screen rectangle of the surface.
    pub displayed: Rect,
    /// Render resolution.
    pub logical: Size,
    /// Current time in milliseconds.
    pub now_ms: f64,
    subscribed: bool,
    subscribe_calls: usize,
}

impl<N> HeadlessHost<N> {
    /// Creates a host displaying a `logical`-sized surface at the origin,
    /// unscaled.
    #[must_use]
    pub fn new(logical: Size) -> Self {
        Self {
            root: None,
            visible_surface: true,
            displayed: Rect::from_origin_size((0.0, 0.0), logical),
            logical,
            now_ms: 0.0,
            subscribed: false,
            subscribe_calls: 0,
        }
    }

    /// Returns whether post-render notifications are wanted.
    #[must_use]
    pub fn post_render_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Returns how many times a subscription was started.
    #[must_use]
    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }
}

impl<N: Copy + Ord + core::fmt::Debug> RenderHost for HeadlessHost<N> {
    type Node = N;

    fn subscribe_post_render(&mut self) {
        self.subscribed = true;
        self.subscribe_calls += 1;
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
        self.displayed
    }

    fn logical_surface_size(&self) -> Size {
        self.logical
    }

    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// An [`InteractionSink`] that records what it receives.
#[derive(Clone, Debug)]
pub struct RecordingInteraction<N> {
    /// Dispatched events with their targets, in order.
    pub dispatched: Vec<(N, CanonicalEvent)>,
    /// Last root target set.
    pub root: Option<N>,
}

impl<N> Default for RecordingInteraction<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> RecordingInteraction<N> {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dispatched: Vec::new(),
            root: None,
        }
    }

    /// Returns the dispatched event names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.dispatched.iter().map(|(_, e)| e.as_str()).collect()
    }
}

impl<N> InteractionSink<N> for RecordingInteraction<N> {
    fn dispatch(&mut self, target: N, event: CanonicalEvent) {
        self.dispatched.push((target, event));
    }

    fn set_root_target(&mut self, root: N) {
        self.root = Some(root);
    }
}
