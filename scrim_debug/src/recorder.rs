// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event it sees, in
//! order, as a [`RecordedEvent`]. Pass the recording to
//! [`json::export`](crate::json::export) or inspect it directly in tests.

use scrim_core::trace::{
    ActivationEvent, BindEvent, DispatchEvent, PassBeginEvent, PassSummary, TraceSink,
    UnbindEvent,
};

/// One captured trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_activation`].
    Activation(ActivationEvent),
    /// See [`TraceSink::on_pass_begin`].
    PassBegin(PassBeginEvent),
    /// See [`TraceSink::on_bind`].
    Bind(BindEvent),
    /// See [`TraceSink::on_unbind`].
    Unbind(UnbindEvent),
    /// See [`TraceSink::on_pass_end`].
    PassEnd(PassSummary),
    /// See [`TraceSink::on_dispatch`].
    Dispatch(DispatchEvent),
}

impl RecordedEvent {
    /// Returns the pass generation the event belongs to, if any.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::PassBegin(e) => Some(e.generation),
            Self::Bind(e) => Some(e.generation),
            Self::Unbind(e) => Some(e.generation),
            Self::PassEnd(s) => Some(s.generation),
            Self::Activation(_) | Self::Dispatch(_) => None,
        }
    }
}

/// A [`TraceSink`] that stores events in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns the summaries of all completed passes.
    pub fn summaries(&self) -> impl Iterator<Item = &PassSummary> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::PassEnd(s) => Some(s),
            _ => None,
        })
    }
}

impl TraceSink for RecorderSink {
    fn on_activation(&mut self, e: &ActivationEvent) {
        self.events.push(RecordedEvent::Activation(*e));
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.events.push(RecordedEvent::PassBegin(*e));
    }

    fn on_bind(&mut self, e: &BindEvent) {
        self.events.push(RecordedEvent::Bind(*e));
    }

    fn on_unbind(&mut self, e: &UnbindEvent) {
        self.events.push(RecordedEvent::Unbind(*e));
    }

    fn on_pass_end(&mut self, s: &PassSummary) {
        self.events.push(RecordedEvent::PassEnd(*s));
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        self.events.push(RecordedEvent::Dispatch(*e));
    }
}
