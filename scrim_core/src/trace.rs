// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the overlay engine.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls on activation changes, during each reconciliation pass and
//! when bridging proxy events. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Events carry proxy ids and counters only, never scene nodes, so a sink is
//! independent of the scene's node type.

use crate::activation::{ActivationCause, ActivationState};
use crate::backend::ProxyId;
use crate::bridge::CanonicalEvent;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the overlay changes activation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationEvent {
    /// The state entered.
    pub state: ActivationState,
    /// What caused the transition.
    pub cause: ActivationCause,
    /// Whether mobile mode is set after the transition.
    pub mobile: bool,
}

/// Marks the beginning of a reconciliation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassBeginEvent {
    /// Pass counter.
    pub generation: u64,
    /// Nodes tracked before the pass.
    pub tracked: usize,
}

/// Emitted when a node gains a proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindEvent {
    /// Pass counter.
    pub generation: u64,
    /// The proxy bound to the node.
    pub proxy: ProxyId,
    /// Whether the proxy came from the pool rather than being constructed.
    pub recycled: bool,
    /// The node's tab index.
    pub tab_index: i32,
}

/// Emitted when a node loses its proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnbindEvent {
    /// Pass counter.
    pub generation: u64,
    /// The proxy returned to the pool.
    pub proxy: ProxyId,
}

/// Per-pass summary, emitted at the end of every reconciliation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub generation: u64,
    /// Candidates discovered by the walk.
    pub candidates: usize,
    /// Nodes that gained a proxy this pass.
    pub bound: usize,
    /// Nodes that lost their proxy this pass.
    pub unbound: usize,
    /// Proxies placed at the end of the pass.
    pub placed: usize,
    /// Idle proxies in the pool after the pass.
    pub pool_available: usize,
    /// Proxies ever constructed.
    pub constructed: usize,
}

/// Emitted for every canonical event dispatched by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchEvent {
    /// The proxy that received the native event.
    pub proxy: ProxyId,
    /// The canonical event dispatched to the bound node.
    pub event: CanonicalEvent,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the overlay engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the overlay is activated or deactivated.
    fn on_activation(&mut self, e: &ActivationEvent) {
        _ = e;
    }

    /// Called at the beginning of a reconciliation pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when a node gains a proxy.
    fn on_bind(&mut self, e: &BindEvent) {
        _ = e;
    }

    /// Called when a node loses its proxy.
    fn on_unbind(&mut self, e: &UnbindEvent) {
        _ = e;
    }

    /// Called at the end of a reconciliation pass.
    fn on_pass_end(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called for each bridged canonical event.
    fn on_dispatch(&mut self, e: &DispatchEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`ActivationEvent`].
    #[inline]
    pub fn activation(&mut self, e: &ActivationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_activation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BindEvent`].
    #[inline]
    pub fn bind(&mut self, e: &BindEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_bind(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnbindEvent`].
    #[inline]
    pub fn unbind(&mut self, e: &UnbindEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unbind(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_end(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_end(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`DispatchEvent`].
    #[inline]
    pub fn dispatch(&mut self, e: &DispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
