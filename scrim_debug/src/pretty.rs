// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use scrim_core::activation::ActivationState;
use scrim_core::trace::{
    ActivationEvent, BindEvent, DispatchEvent, PassBeginEvent, PassSummary, TraceSink,
    UnbindEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

pub(crate) fn state_name(state: ActivationState) -> &'static str {
    match state {
        ActivationState::Inactive => "inactive",
        ActivationState::Active => "active",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_activation(&mut self, e: &ActivationEvent) {
        let _ = writeln!(
            self.writer,
            "[activation] state={} cause={:?} mobile={}",
            state_name(e.state),
            e.cause,
            e.mobile,
        );
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] gen={} tracked={}",
            e.generation, e.tracked,
        );
    }

    fn on_bind(&mut self, e: &BindEvent) {
        let _ = writeln!(
            self.writer,
            "[bind] gen={} proxy={} recycled={} tab_index={}",
            e.generation, e.proxy.0, e.recycled, e.tab_index,
        );
    }

    fn on_unbind(&mut self, e: &UnbindEvent) {
        let _ = writeln!(
            self.writer,
            "[unbind] gen={} proxy={}",
            e.generation, e.proxy.0,
        );
    }

    fn on_pass_end(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[pass:end] gen={} candidates={} bound={} unbound={} placed={} pool={} constructed={}",
            s.generation,
            s.candidates,
            s.bound,
            s.unbound,
            s.placed,
            s.pool_available,
            s.constructed,
        );
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[dispatch] proxy={} event={}",
            e.proxy.0,
            e.event.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrim_core::activation::ActivationCause;
    use scrim_core::backend::ProxyId;
    use scrim_core::bridge::CanonicalEvent;

    #[test]
    fn pretty_print_produces_output() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());

        sink.on_activation(&ActivationEvent {
            state: ActivationState::Active,
            cause: ActivationCause::TabKey,
            mobile: false,
        });
        sink.on_pass_begin(&PassBeginEvent {
            generation: 1,
            tracked: 0,
        });
        sink.on_bind(&BindEvent {
            generation: 1,
            proxy: ProxyId(0),
            recycled: false,
            tab_index: 0,
        });
        sink.on_pass_end(&PassSummary {
            generation: 1,
            candidates: 1,
            bound: 1,
            unbound: 0,
            placed: 1,
            pool_available: 0,
            constructed: 1,
        });
        sink.on_dispatch(&DispatchEvent {
            proxy: ProxyId(0),
            event: CanonicalEvent::Click,
        });

        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(
            output.contains("[activation] state=active cause=TabKey mobile=false"),
            "got: {output}"
        );
        assert!(output.contains("[pass:begin] gen=1"), "got: {output}");
        assert!(output.contains("[bind] gen=1 proxy=0"), "got: {output}");
        assert!(output.contains("bound=1"), "got: {output}");
        assert!(
            output.contains("[dispatch] proxy=0 event=click"),
            "got: {output}"
        );
        assert_eq!(output.lines().count(), 5, "one line per event");
    }

    #[test]
    fn unbind_line() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_unbind(&UnbindEvent {
            generation: 7,
            proxy: ProxyId(3),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(output, "[unbind] gen=7 proxy=3\n");
    }
}
