// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay engine: activation, per-frame reconciliation and event
//! bridging.
//!
//! [`OverlayEngine`] owns the render host, the overlay backend, the proxy
//! pool and the engine-side shadow table. Its owner drives it from two places:
//!
//! - after every render while [`RenderHost::subscribe_post_render`] is in
//!   effect, call [`OverlayEngine::update`] with the scene;
//! - whenever the backend may have queued input, call
//!   [`OverlayEngine::pump`].
//!
//! # Reconciliation
//!
//! Each pass increments the generation, walks the scene from the current
//! render root, binds a proxy to every newly discovered candidate and stamps
//! every discovered candidate with the generation. Tracked nodes whose stamp
//! is older are stale: their proxies go back to the pool. Only then are the
//! surviving proxies placed. A node is in the tracked set iff it has a shadow
//! entry iff its proxy is attached.
//!
//! # Input
//!
//! Proxy events are raised against a [`ProxyId`], and a pass may hand that
//! proxy to a different node before the owner pumps. Before any pass or
//! release changes a binding, the engine moves the backend's queue into its
//! own inbox and records the node each proxy event was aimed at. An event is
//! dispatched only if its proxy is still bound to that node.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use core::fmt;

use kurbo::Vec2;

use crate::activation::{Activation, ActivationCause, ActivationState};
use crate::backend::{
    GlobalListener, Key, OverlayBackend, OverlayEvent, ProxyEvent, ProxyId, ProxyStyle,
    RenderHost,
};
use crate::bridge::{self, InteractionSink};
use crate::config::{HostQuirks, OverlayConfig};
use crate::geometry::{self, Viewport};
use crate::pool::ProxyPool;
use crate::scene::SceneGraph;
use crate::trace::{
    ActivationEvent, BindEvent, DispatchEvent, PassBeginEvent, PassSummary, Tracer, UnbindEvent,
};
use crate::walk;

/// Engine-side state of a tracked node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Shadow {
    generation: u64,
    proxy: ProxyId,
}

/// Input taken off the backend queue ahead of a binding change.
#[derive(Clone, Copy, Debug)]
struct Pending<N> {
    event: OverlayEvent,
    /// Node the event's proxy was bound to when it was taken.
    target: Option<N>,
}

/// Mirrors a scene graph into native focusable proxies.
pub struct OverlayEngine<B: OverlayBackend, H: RenderHost> {
    backend: B,
    host: H,
    config: OverlayConfig,
    quirks: HostQuirks,
    activation: Activation,
    pool: ProxyPool<B::Element, H::Node>,
    tracked: Vec<H::Node>,
    shadow: BTreeMap<H::Node, Shadow>,
    generation: u64,
    candidates: Vec<H::Node>,
    inbox: VecDeque<Pending<H::Node>>,
    next_update_ms: f64,
    hook_present: bool,
    destroyed: bool,
}

impl<B: OverlayBackend, H: RenderHost> fmt::Debug for OverlayEngine<B, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("state", &self.activation.state())
            .field("mobile", &self.activation.is_mobile())
            .field("generation", &self.generation)
            .field("tracked", &self.tracked)
            .field("constructed", &self.pool.constructed())
            .field("pending", &self.inbox.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<B: OverlayBackend, H: RenderHost> OverlayEngine<B, H> {
    /// Creates an inactive engine.
    ///
    /// Registers the key-down listener and, on touch-capable hosts, inserts
    /// the touch hook.
    pub fn new(mut backend: B, host: H, config: OverlayConfig, quirks: HostQuirks) -> Self {
        backend.listen(GlobalListener::KeyDown);
        if quirks.touch_capable {
            backend.insert_touch_hook();
        }
        Self {
            backend,
            host,
            config,
            quirks,
            activation: Activation::default(),
            pool: ProxyPool::new(),
            tracked: Vec::new(),
            shadow: BTreeMap::new(),
            generation: 0,
            candidates: Vec::new(),
            inbox: VecDeque::new(),
            next_update_ms: f64::NEG_INFINITY,
            hook_present: quirks.touch_capable,
            destroyed: false,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Returns the overlay backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the overlay backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Returns the render host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the render host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Returns the host quirks in effect.
    #[must_use]
    pub fn quirks(&self) -> &HostQuirks {
        &self.quirks
    }

    /// Returns the activation state.
    #[must_use]
    pub fn state(&self) -> ActivationState {
        self.activation.state()
    }

    /// Returns whether the overlay is live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    /// Returns whether the sticky mobile mode is set.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.activation.is_mobile()
    }

    /// Returns whether the touch hook is still in place.
    #[must_use]
    pub fn has_touch_hook(&self) -> bool {
        self.hook_present
    }

    /// Returns whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Returns the generation of the most recent pass.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the tracked nodes, in the order they were first bound.
    #[must_use]
    pub fn tracked(&self) -> &[H::Node] {
        &self.tracked
    }

    /// Returns the proxy bound to `node`.
    #[must_use]
    pub fn proxy_of(&self, node: H::Node) -> Option<ProxyId> {
        self.shadow.get(&node).map(|s| s.proxy)
    }

    /// Returns the proxy pool.
    #[must_use]
    pub fn pool(&self) -> &ProxyPool<B::Element, H::Node> {
        &self.pool
    }

    // -- activation ---------------------------------------------------------

    /// Activates the overlay as if the Tab key had been pressed.
    pub fn activate(&mut self, tracer: &mut Tracer<'_>) {
        self.enter_active(ActivationCause::Explicit, tracer);
    }

    /// Deactivates the overlay. Has no effect in mobile mode.
    pub fn deactivate(&mut self, tracer: &mut Tracer<'_>) {
        self.enter_inactive(ActivationCause::Explicit, tracer);
    }

    fn enter_active(&mut self, cause: ActivationCause, tracer: &mut Tracer<'_>) {
        if self.destroyed || !self.activation.activate() {
            return;
        }
        self.backend.unlisten(GlobalListener::KeyDown);
        self.backend.listen(GlobalListener::PointerMove);
        self.host.subscribe_post_render();
        self.backend.attach_container();
        self.trace_activation(cause, tracer);
    }

    fn enter_inactive(&mut self, cause: ActivationCause, tracer: &mut Tracer<'_>) {
        if self.destroyed || !self.activation.deactivate() {
            return;
        }
        self.backend.unlisten(GlobalListener::PointerMove);
        self.backend.listen(GlobalListener::KeyDown);
        self.host.unsubscribe_post_render();
        self.release_all(tracer);
        self.backend.detach_container();
        self.trace_activation(cause, tracer);
    }

    fn trace_activation(&self, cause: ActivationCause, tracer: &mut Tracer<'_>) {
        tracer.activation(&ActivationEvent {
            state: self.activation.state(),
            cause,
            mobile: self.activation.is_mobile(),
        });
    }

    /// Returns every tracked proxy to the pool.
    fn release_all(&mut self, tracer: &mut Tracer<'_>) {
        self.stash_queued();
        for node in self.tracked.drain(..) {
            if let Some(shadow) = self.shadow.remove(&node) {
                self.pool.release(&mut self.backend, shadow.proxy);
                tracer.unbind(&UnbindEvent {
                    generation: self.generation,
                    proxy: shadow.proxy,
                });
            }
        }
    }

    // -- reconciliation -----------------------------------------------------

    /// Runs one reconciliation pass against `scene`.
    ///
    /// Does nothing while inactive, while throttled, or when the host's last
    /// render did not target the visible surface.
    pub fn update<S>(&mut self, scene: &S, tracer: &mut Tracer<'_>)
    where
        S: SceneGraph<Node = H::Node>,
    {
        if self.destroyed || !self.activation.is_active() {
            return;
        }
        if let Some(interval) = self.quirks.update_interval_ms {
            let now = self.host.now_ms();
            if now < self.next_update_ms {
                return;
            }
            self.next_update_ms = now + interval;
        }
        if !self.host.is_rendering_to_visible_surface() {
            return;
        }
        self.stash_queued();

        self.generation += 1;
        let generation = self.generation;
        tracer.pass_begin(&PassBeginEvent {
            generation,
            tracked: self.tracked.len(),
        });

        // Discover, bind and stamp.
        let mut candidates = core::mem::take(&mut self.candidates);
        match self.host.current_render_root() {
            Some(root) => walk::collect_candidates(scene, root, &mut candidates),
            None => candidates.clear(),
        }
        let mut bound = 0;
        for &node in &candidates {
            if let Some(shadow) = self.shadow.get_mut(&node) {
                shadow.generation = generation;
            } else if self.bind(scene, node, tracer) {
                bound += 1;
            }
        }
        let discovered = candidates.len();
        self.candidates = candidates;

        let displayed = self.host.displayed_surface_rect();
        self.backend.set_container_rect(displayed);
        let viewport = Viewport::new(displayed, self.host.logical_surface_size());

        // Unbind stale entries.
        let Self {
            tracked,
            shadow,
            pool,
            backend,
            ..
        } = self;
        let mut unbound = 0;
        tracked.retain(|node| {
            let live = shadow.get(node).is_some_and(|s| s.generation == generation);
            if !live {
                if let Some(stale) = shadow.remove(node) {
                    pool.release(backend, stale.proxy);
                    tracer.unbind(&UnbindEvent {
                        generation,
                        proxy: stale.proxy,
                    });
                }
                unbound += 1;
            }
            live
        });
        if unbound > 0 && self.tracked.is_empty() {
            self.enter_inactive(ActivationCause::EmptyOverlay, tracer);
        }

        // Place the survivors.
        let Self {
            tracked,
            shadow,
            pool,
            backend,
            config,
            ..
        } = self;
        let mut placed = 0;
        for &node in tracked.iter() {
            let Some(entry) = shadow.get(&node) else {
                continue;
            };
            let Some(proxy) = pool.get_mut(entry.proxy) else {
                continue;
            };
            geometry::place(backend, scene, node, proxy, &viewport, config.debug);
            placed += 1;
        }

        tracer.pass_end(&PassSummary {
            generation,
            candidates: discovered,
            bound,
            unbound,
            placed,
            pool_available: self.pool.available(),
            constructed: self.pool.constructed(),
        });
    }

    /// Binds a proxy to `node`. Returns `false` if none could be acquired.
    fn bind<S>(&mut self, scene: &S, node: H::Node, tracer: &mut Tracer<'_>) -> bool
    where
        S: SceneGraph<Node = H::Node>,
    {
        let style = ProxyStyle {
            debug: self.config.debug,
            live_mode: self.quirks.live_mode,
            relevant: self.quirks.relevant,
        };
        let Some((id, recycled)) = self.pool.acquire(&mut self.backend, &style) else {
            return false;
        };
        let Some(proxy) = self.pool.get_mut(id) else {
            return false;
        };
        let attrs = scene.accessibility(node);
        proxy.bound = Some(node);
        geometry::mirror_initial(&mut self.backend, proxy, attrs, self.config.debug);
        self.backend.attach_proxy(&proxy.element);

        self.shadow.insert(
            node,
            Shadow {
                generation: self.generation,
                proxy: id,
            },
        );
        self.tracked.push(node);
        tracer.bind(&BindEvent {
            generation: self.generation,
            proxy: id,
            recycled,
            tab_index: attrs.tab_index,
        });
        true
    }

    // -- input --------------------------------------------------------------

    /// Drains the inbox, then the backend's event queue through
    /// [`handle_event`](Self::handle_event).
    ///
    /// Returns the number of events handled.
    pub fn pump<I>(&mut self, sink: &mut I, tracer: &mut Tracer<'_>) -> usize
    where
        I: InteractionSink<H::Node>,
    {
        let mut handled = 0;
        loop {
            if let Some(pending) = self.inbox.pop_front() {
                self.deliver(pending.event, pending.target, sink, tracer);
            } else if let Some(event) = self.backend.poll_event() {
                self.handle_event(event, sink, tracer);
            } else {
                break;
            }
            handled += 1;
        }
        handled
    }

    /// Reacts to one input from the overlay tree.
    ///
    /// Proxy events are resolved against the current bindings.
    pub fn handle_event<I>(&mut self, event: OverlayEvent, sink: &mut I, tracer: &mut Tracer<'_>)
    where
        I: InteractionSink<H::Node>,
    {
        let target = self.bound_target(event);
        self.deliver(event, target, sink, tracer);
    }

    /// Moves the backend's queue into the inbox. Must run before anything
    /// rebinds a proxy.
    fn stash_queued(&mut self) {
        while let Some(event) = self.backend.poll_event() {
            let target = self.bound_target(event);
            self.inbox.push_back(Pending { event, target });
        }
    }

    fn bound_target(&self, event: OverlayEvent) -> Option<H::Node> {
        match event {
            OverlayEvent::Proxy(id, _) => self.pool.get(id).and_then(|p| p.bound),
            _ => None,
        }
    }

    fn deliver<I>(
        &mut self,
        event: OverlayEvent,
        target: Option<H::Node>,
        sink: &mut I,
        tracer: &mut Tracer<'_>,
    ) where
        I: InteractionSink<H::Node>,
    {
        if self.destroyed {
            return;
        }
        match event {
            OverlayEvent::KeyDown(Key::Tab) => self.enter_active(ActivationCause::TabKey, tracer),
            OverlayEvent::KeyDown(Key::Other) => {}
            OverlayEvent::PointerMove(movement) => {
                if movement != Vec2::ZERO {
                    self.enter_inactive(ActivationCause::PointerMove, tracer);
                }
            }
            OverlayEvent::TouchHookFocus => {
                if self.hook_present {
                    self.activation.enter_mobile();
                    self.enter_active(ActivationCause::TouchHook, tracer);
                    self.backend.remove_touch_hook();
                    self.hook_present = false;
                }
            }
            OverlayEvent::Proxy(id, proxy_event) => {
                if let Some(target) = target {
                    self.bridge(id, target, proxy_event, sink, tracer);
                }
            }
        }
    }

    fn bridge<I>(
        &mut self,
        id: ProxyId,
        target: H::Node,
        event: ProxyEvent,
        sink: &mut I,
        tracer: &mut Tracer<'_>,
    ) where
        I: InteractionSink<H::Node>,
    {
        let Some(proxy) = self.pool.get_mut(id) else {
            return;
        };
        if proxy.bound != Some(target) {
            return;
        }

        let bridged = bridge::translate(event);
        if let Some(mode) = bridged.live_mode
            && proxy.live_mode != mode
        {
            self.backend.set_live_mode(&proxy.element, mode);
            proxy.live_mode = mode;
        }

        if let Some(root) = self.host.current_render_root() {
            sink.set_root_target(root);
        }
        for &canonical in bridged.events {
            sink.dispatch(target, canonical);
            tracer.dispatch(&DispatchEvent {
                proxy: id,
                event: canonical,
            });
        }
    }

    // -- teardown -----------------------------------------------------------

    /// Tears the engine down.
    ///
    /// Removes both global listeners, the post-render subscription and the
    /// touch hook, then releases and destroys every proxy. Safe from any
    /// state; later calls to any entry point do nothing.
    pub fn destroy(&mut self, tracer: &mut Tracer<'_>) {
        if self.destroyed {
            return;
        }
        self.backend.unlisten(GlobalListener::KeyDown);
        self.backend.unlisten(GlobalListener::PointerMove);
        self.host.unsubscribe_post_render();
        if self.hook_present {
            self.backend.remove_touch_hook();
            self.hook_present = false;
        }

        self.release_all(tracer);
        self.backend.detach_container();
        if self.activation.reset() {
            self.trace_activation(ActivationCause::Teardown, tracer);
        }

        self.shadow.clear();
        self.candidates.clear();
        self.inbox.clear();
        self.pool.destroy_all(&mut self.backend);
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec;

    use kurbo::{Affine, Rect, Size};

    use super::*;
    use crate::backend::LiveMode;
    use crate::bridge::CanonicalEvent;
    use crate::headless::{HeadlessHost, HeadlessOverlay, RecordingInteraction};
    use crate::scene::{AccessibleAttrs, NodeId, SceneStore};

    type Engine = OverlayEngine<HeadlessOverlay, HeadlessHost<NodeId>>;

    fn engine_with(config: OverlayConfig, quirks: HostQuirks) -> Engine {
        let host = HeadlessHost::new(Size::new(100.0, 100.0));
        OverlayEngine::new(HeadlessOverlay::new(), host, config, quirks)
    }

    fn engine() -> Engine {
        engine_with(OverlayConfig::default(), HostQuirks::default())
    }

    /// A root with `count` 10×10 buttons laid out 20 px apart.
    fn scene(count: usize) -> (SceneStore, NodeId, Vec<NodeId>) {
        let mut scene = SceneStore::new();
        let root = scene.create_node();
        let mut buttons = Vec::new();
        for i in 0..count {
            let node = scene.create_node();
            scene.set_accessibility(node, AccessibleAttrs::titled(format!("b{i}")));
            scene.set_interactive(node, true);
            scene.set_bounds(node, Rect::new(0.0, 0.0, 10.0, 10.0));
            scene.set_transform(node, Affine::translate((20.0 * i as f64, 0.0)));
            scene.add_child(root, node);
            buttons.push(node);
        }
        (scene, root, buttons)
    }

    fn pump(engine: &mut Engine) -> RecordingInteraction<NodeId> {
        let mut sink = RecordingInteraction::new();
        engine.pump(&mut sink, &mut Tracer::none());
        sink
    }

    fn tab(engine: &mut Engine) {
        assert!(engine.backend_mut().press_key(Key::Tab), "keydown not observed");
        pump(engine);
    }

    fn update(engine: &mut Engine, scene: &SceneStore) {
        engine.update(scene, &mut Tracer::none());
    }

    fn assert_conserved(engine: &Engine) {
        assert_eq!(
            engine.pool().available() + engine.tracked().len(),
            engine.pool().constructed(),
            "pool conservation"
        );
    }

    #[test]
    fn tab_activates_and_swaps_listeners() {
        let mut engine = engine();
        assert!(engine.backend().is_listening(GlobalListener::KeyDown));
        assert!(!engine.backend().is_listening(GlobalListener::PointerMove));

        tab(&mut engine);
        assert_eq!(engine.state(), ActivationState::Active);
        assert!(!engine.backend().is_listening(GlobalListener::KeyDown));
        assert!(engine.backend().is_listening(GlobalListener::PointerMove));
        assert!(engine.host().post_render_subscribed());
        assert!(engine.backend().is_container_attached());
    }

    #[test]
    fn other_keys_do_not_activate() {
        let mut engine = engine();
        engine.backend_mut().press_key(Key::Other);
        pump(&mut engine);
        assert!(!engine.is_active());
    }

    #[test]
    fn activation_is_idempotent() {
        let mut engine = engine();
        engine.activate(&mut Tracer::none());
        engine.activate(&mut Tracer::none());
        assert_eq!(engine.host().subscribe_calls(), 1);
        assert_eq!(engine.backend().container_attach_count(), 1);

        engine.deactivate(&mut Tracer::none());
        engine.deactivate(&mut Tracer::none());
        assert!(!engine.is_active());
        assert!(engine.backend().is_listening(GlobalListener::KeyDown));
        assert!(!engine.backend().is_container_attached());
    }

    #[test]
    fn update_while_inactive_does_nothing() {
        let (scene, root, _) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        update(&mut engine, &scene);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.pool().constructed(), 0);
    }

    #[test]
    fn offscreen_render_is_skipped() {
        let (scene, root, _) = scene(1);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        engine.host_mut().visible_surface = false;
        tab(&mut engine);
        update(&mut engine, &scene);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn pass_binds_in_discovery_order() {
        let (scene, root, buttons) = scene(3);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.tracked(), buttons.as_slice());
        let proxies: Vec<ProxyId> = buttons
            .iter()
            .map(|&b| engine.proxy_of(b).unwrap())
            .collect();
        assert_eq!(engine.backend().attached_proxies(), proxies.as_slice());
        assert_conserved(&engine);

        // A second pass reuses every binding.
        update(&mut engine, &scene);
        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.pool().constructed(), 3);
        assert_conserved(&engine);
    }

    #[test]
    fn stale_nodes_are_released() {
        let (mut scene, root, buttons) = scene(3);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let gone = engine.proxy_of(buttons[1]).unwrap();

        scene.set_visible(buttons[1], false);
        update(&mut engine, &scene);

        assert_eq!(engine.tracked(), &[buttons[0], buttons[2]]);
        assert_eq!(engine.proxy_of(buttons[1]), None);
        assert!(engine.pool().is_available(gone));
        assert!(!engine.backend().element(gone).unwrap().attached);
        assert_eq!(engine.pool().get(gone).unwrap().bound(), None);
        assert_conserved(&engine);
    }

    #[test]
    fn newly_bound_proxies_append_after_survivors() {
        let (mut scene, root, buttons) = scene(3);
        scene.set_visible(buttons[0], false);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        scene.set_visible(buttons[0], true);
        update(&mut engine, &scene);
        assert_eq!(engine.tracked(), &[buttons[1], buttons[2], buttons[0]]);
    }

    #[test]
    fn emptied_overlay_deactivates() {
        let (mut scene, root, _) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        assert!(engine.is_active());

        scene.set_visible(root, false);
        update(&mut engine, &scene);
        assert!(!engine.is_active());
        assert!(engine.tracked().is_empty());
        assert_eq!(engine.pool().available(), 2);
        assert!(!engine.backend().is_container_attached());
        assert!(engine.backend().is_listening(GlobalListener::KeyDown));
        assert!(!engine.host().post_render_subscribed());
    }

    #[test]
    fn empty_scene_stays_active() {
        let (scene, root, _) = scene(0);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        assert!(engine.is_active(), "nothing was ever exposed");
    }

    #[test]
    fn missing_root_releases_everything() {
        let (scene, root, _) = scene(1);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        engine.host_mut().root = None;
        update(&mut engine, &scene);
        assert!(engine.tracked().is_empty());
        assert_conserved(&engine);
    }

    #[test]
    fn pointer_movement_deactivates_and_returns_proxies() {
        let (scene, root, _) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        engine.backend_mut().move_pointer(Vec2::ZERO);
        pump(&mut engine);
        assert!(engine.is_active(), "zero movement is ignored");

        engine.backend_mut().move_pointer(Vec2::new(3.0, 0.0));
        pump(&mut engine);
        assert!(!engine.is_active());
        assert!(engine.tracked().is_empty());
        assert_eq!(engine.pool().available(), 2);
        assert!(engine.backend().attached_proxies().is_empty());
    }

    #[test]
    fn touch_hook_enters_sticky_mobile_mode() {
        let quirks = HostQuirks {
            touch_capable: true,
            ..HostQuirks::default()
        };
        let (mut scene, root, _) = scene(1);
        let mut engine = engine_with(OverlayConfig::default(), quirks);
        engine.host_mut().root = Some(root);
        assert!(engine.backend().has_touch_hook());

        assert!(engine.backend_mut().focus_touch_hook());
        pump(&mut engine);
        assert!(engine.is_active());
        assert!(engine.is_mobile());
        assert!(!engine.backend().has_touch_hook(), "hook is one-shot");
        assert!(!engine.has_touch_hook());

        update(&mut engine, &scene);
        engine.backend_mut().move_pointer(Vec2::new(1.0, 1.0));
        pump(&mut engine);
        assert!(engine.is_active(), "pointer movement ignored in mobile mode");

        scene.set_visible(root, false);
        update(&mut engine, &scene);
        assert!(engine.is_active(), "emptying ignored in mobile mode");
    }

    #[test]
    fn android_passes_are_throttled() {
        let quirks = HostQuirks::from_user_agent(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/126.0 Mobile Safari/537.36",
        );
        let (scene, root, _) = scene(1);
        let mut engine = engine_with(OverlayConfig::default(), quirks);
        engine.host_mut().root = Some(root);
        engine.activate(&mut Tracer::none());

        engine.host_mut().now_ms = 1_000.0;
        update(&mut engine, &scene);
        assert_eq!(engine.generation(), 1);

        engine.host_mut().now_ms = 1_200.0;
        update(&mut engine, &scene);
        assert_eq!(engine.generation(), 1, "inside the interval");

        engine.host_mut().now_ms = 1_500.0;
        update(&mut engine, &scene);
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn container_and_proxies_follow_the_displayed_surface() {
        let (scene, root, buttons) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        engine.host_mut().displayed = Rect::new(8.0, 16.0, 208.0, 216.0);
        tab(&mut engine);
        update(&mut engine, &scene);

        assert_eq!(
            engine.backend().container_rect(),
            Some(Rect::new(8.0, 16.0, 208.0, 216.0))
        );
        let second = engine.proxy_of(buttons[1]).unwrap();
        assert_eq!(
            engine.backend().element(second).unwrap().rect,
            Rect::new(40.0, 0.0, 60.0, 20.0)
        );
    }

    #[test]
    fn unlabeled_node_gets_fallback_title() {
        let (mut scene, root, buttons) = scene(1);
        scene.set_accessibility(buttons[0], AccessibleAttrs::untitled(3));
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        let id = engine.proxy_of(buttons[0]).unwrap();
        let element = engine.backend().element(id).unwrap();
        assert_eq!(element.title.as_deref(), Some("node 3"));
        assert_eq!(element.label, None);
        assert_eq!(element.tab_index, Some(3));
        assert_eq!(element.kind.as_deref(), Some("button"));
        assert_eq!(element.pointer_events.as_deref(), Some("auto"));
    }

    #[test]
    fn hint_only_node_gets_a_label() {
        let (mut scene, root, buttons) = scene(1);
        let attrs = scene.accessibility_mut(buttons[0]);
        attrs.title = None;
        attrs.hint = Some("opens the menu".into());
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        let id = engine.proxy_of(buttons[0]).unwrap();
        let element = engine.backend().element(id).unwrap();
        assert_eq!(element.label.as_deref(), Some("opens the menu"));
        assert_eq!(element.title, None);
    }

    #[test]
    fn recycled_proxy_drops_previous_label() {
        let (mut scene, root, buttons) = scene(3);
        scene.accessibility_mut(buttons[1]).hint = Some("hint".into());
        scene.set_visible(buttons[2], false);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let recycled = engine.proxy_of(buttons[1]).unwrap();

        scene.set_visible(buttons[1], false);
        update(&mut engine, &scene);
        scene.set_visible(buttons[2], true);
        update(&mut engine, &scene);

        assert_eq!(engine.proxy_of(buttons[2]), Some(recycled));
        let element = engine.backend().element(recycled).unwrap();
        assert_eq!(element.label, None);
        assert_eq!(element.title.as_deref(), Some("b2"));
        assert_eq!(engine.pool().constructed(), 2);
    }

    #[test]
    fn unchanged_title_is_not_rewritten() {
        let (mut scene, root, buttons) = scene(1);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        update(&mut engine, &scene);
        let id = engine.proxy_of(buttons[0]).unwrap();
        assert_eq!(engine.backend().element(id).unwrap().title_writes, 1);

        scene.accessibility_mut(buttons[0]).title = Some("renamed".into());
        update(&mut engine, &scene);
        let element = engine.backend().element(id).unwrap();
        assert_eq!(element.title_writes, 2);
        assert_eq!(element.title.as_deref(), Some("renamed"));
    }

    #[test]
    fn debug_mode_fills_and_describes_proxies() {
        let (scene, root, buttons) = scene(1);
        let mut engine = engine_with(OverlayConfig { debug: true }, HostQuirks::default());
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        let id = engine.proxy_of(buttons[0]).unwrap();
        let element = engine.backend().element(id).unwrap();
        assert!(element.debug_fill);
        assert_eq!(
            element.debug_text.as_deref(),
            Some("type: button\ntitle: b0\ntabIndex: 0")
        );
    }

    #[test]
    fn proxy_click_dispatches_triple_to_bound_node() {
        let (scene, root, buttons) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);

        let id = engine.proxy_of(buttons[1]).unwrap();
        assert!(engine.backend_mut().click(id));
        let sink = pump(&mut engine);
        assert_eq!(sink.names(), vec!["click", "pointertap", "tap"]);
        assert!(sink.dispatched.iter().all(|(target, _)| *target == buttons[1]));
        assert_eq!(sink.root, Some(root));
    }

    #[test]
    fn focus_and_blur_switch_live_mode() {
        let (scene, root, buttons) = scene(1);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let id = engine.proxy_of(buttons[0]).unwrap();

        engine.backend_mut().focus(id);
        let sink = pump(&mut engine);
        assert_eq!(sink.dispatched, vec![(buttons[0], CanonicalEvent::MouseOver)]);
        assert_eq!(
            engine.backend().element(id).unwrap().live_mode,
            LiveMode::Assertive
        );

        engine.backend_mut().blur(id);
        let sink = pump(&mut engine);
        assert_eq!(sink.dispatched, vec![(buttons[0], CanonicalEvent::MouseOut)]);
        assert_eq!(
            engine.backend().element(id).unwrap().live_mode,
            LiveMode::Polite
        );
    }

    #[test]
    fn events_for_unbound_proxies_are_dropped() {
        let (scene, root, buttons) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let id = engine.proxy_of(buttons[0]).unwrap();

        // Queued while bound, handled after the proxy went back to the pool.
        engine.backend_mut().click(id);
        engine.deactivate(&mut Tracer::none());
        let sink = pump(&mut engine);
        assert!(sink.dispatched.is_empty());

        let mut sink = RecordingInteraction::new();
        engine.handle_event(
            OverlayEvent::Proxy(ProxyId(99), ProxyEvent::Click),
            &mut sink,
            &mut Tracer::none(),
        );
        assert!(sink.dispatched.is_empty());
    }

    #[test]
    fn queued_click_does_not_follow_a_recycled_proxy() {
        let (mut scene, root, buttons) = scene(3);
        let (anchor, a, b) = (buttons[0], buttons[1], buttons[2]);
        scene.set_visible(b, false);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let p = engine.proxy_of(a).unwrap();

        // The user clicks `a`, then two passes run before the queue is pumped.
        assert!(engine.backend_mut().click(p));
        scene.set_visible(a, false);
        update(&mut engine, &scene);
        scene.set_visible(b, true);
        update(&mut engine, &scene);
        assert_eq!(engine.proxy_of(b), Some(p), "proxy recycled to another node");
        assert!(engine.proxy_of(anchor).is_some(), "anchor keeps the overlay live");

        let sink = pump(&mut engine);
        assert!(
            sink.dispatched.iter().all(|(target, _)| *target != b),
            "click on a reached b: {:?}",
            sink.dispatched
        );
        assert!(sink.dispatched.is_empty(), "a is gone, so the click is dropped");
    }

    #[test]
    fn queued_click_survives_a_pass_that_keeps_the_binding() {
        let (scene, root, buttons) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let id = engine.proxy_of(buttons[1]).unwrap();

        assert!(engine.backend_mut().click(id));
        update(&mut engine, &scene);
        assert_eq!(engine.backend().pending(), 0, "queue moved into the engine");

        let sink = pump(&mut engine);
        assert_eq!(sink.names(), vec!["click", "pointertap", "tap"]);
        assert!(sink.dispatched.iter().all(|(target, _)| *target == buttons[1]));
    }

    #[test]
    fn destroy_is_idempotent_and_final() {
        let quirks = HostQuirks {
            touch_capable: true,
            ..HostQuirks::default()
        };
        let (scene, root, buttons) = scene(2);
        let mut engine = engine_with(OverlayConfig::default(), quirks);
        engine.host_mut().root = Some(root);
        tab(&mut engine);
        update(&mut engine, &scene);
        let ids: Vec<ProxyId> = buttons
            .iter()
            .map(|&b| engine.proxy_of(b).unwrap())
            .collect();

        engine.destroy(&mut Tracer::none());
        engine.destroy(&mut Tracer::none());
        assert!(engine.is_destroyed());
        assert!(!engine.is_active());
        assert!(!engine.backend().is_listening(GlobalListener::KeyDown));
        assert!(!engine.backend().is_listening(GlobalListener::PointerMove));
        assert!(!engine.backend().has_touch_hook());
        assert!(!engine.backend().is_container_attached());
        assert!(!engine.host().post_render_subscribed());
        assert_eq!(engine.pool().constructed(), 0);
        for id in ids {
            assert!(engine.backend().element(id).unwrap().destroyed);
        }

        engine.activate(&mut Tracer::none());
        update(&mut engine, &scene);
        assert!(!engine.is_active());
        assert_eq!(engine.generation(), 1);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn passes_are_traced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Counts {
            activations: Vec<ActivationCause>,
            binds: usize,
            unbinds: usize,
            summaries: Vec<PassSummary>,
        }
        impl TraceSink for Counts {
            fn on_activation(&mut self, e: &ActivationEvent) {
                self.activations.push(e.cause);
            }
            fn on_bind(&mut self, _: &BindEvent) {
                self.binds += 1;
            }
            fn on_unbind(&mut self, _: &UnbindEvent) {
                self.unbinds += 1;
            }
            fn on_pass_end(&mut self, s: &PassSummary) {
                self.summaries.push(*s);
            }
        }

        let (mut scene, root, buttons) = scene(2);
        let mut engine = engine();
        engine.host_mut().root = Some(root);
        let mut counts = Counts::default();
        {
            let mut tracer = Tracer::new(&mut counts);
            engine.activate(&mut tracer);
            engine.update(&scene, &mut tracer);
            scene.set_visible(buttons[0], false);
            engine.update(&scene, &mut tracer);
        }

        assert_eq!(counts.activations, vec![ActivationCause::Explicit]);
        assert_eq!(counts.binds, 2);
        assert_eq!(counts.unbinds, 1);
        assert_eq!(counts.summaries.len(), 2);
        assert_eq!(counts.summaries[1].unbound, 1);
        assert_eq!(counts.summaries[1].placed, 1);
        assert_eq!(counts.summaries[1].pool_available, 1);
    }
}
