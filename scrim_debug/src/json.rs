// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] writes a JSON array with one object per [`RecordedEvent`]. Each
//! object carries a `"name"` and, for pass events, the `"gen"` they belong
//! to; the remaining fields go under `"args"`.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::pretty::state_name;
use crate::recorder::RecordedEvent;

/// Writes `events` to `writer` as a JSON array.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events.iter().map(to_value).collect();
    serde_json::to_writer(&mut *writer, &values)?;
    writer.flush()
}

fn to_value(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::Activation(e) => json!({
            "name": "activation",
            "args": {
                "state": state_name(e.state),
                "cause": format!("{:?}", e.cause),
                "mobile": e.mobile,
            },
        }),
        RecordedEvent::PassBegin(e) => json!({
            "name": "pass_begin",
            "gen": e.generation,
            "args": { "tracked": e.tracked },
        }),
        RecordedEvent::Bind(e) => json!({
            "name": "bind",
            "gen": e.generation,
            "args": {
                "proxy": e.proxy.0,
                "recycled": e.recycled,
                "tab_index": e.tab_index,
            },
        }),
        RecordedEvent::Unbind(e) => json!({
            "name": "unbind",
            "gen": e.generation,
            "args": { "proxy": e.proxy.0 },
        }),
        RecordedEvent::PassEnd(s) => json!({
            "name": "pass_end",
            "gen": s.generation,
            "args": {
                "candidates": s.candidates,
                "bound": s.bound,
                "unbound": s.unbound,
                "placed": s.placed,
                "pool_available": s.pool_available,
                "constructed": s.constructed,
            },
        }),
        RecordedEvent::Dispatch(e) => json!({
            "name": "dispatch",
            "args": {
                "proxy": e.proxy.0,
                "event": e.event.as_str(),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use scrim_core::activation::{ActivationCause, ActivationState};
    use scrim_core::backend::ProxyId;
    use scrim_core::bridge::CanonicalEvent;
    use scrim_core::trace::{
        ActivationEvent, DispatchEvent, PassBeginEvent, TraceSink, UnbindEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_activation(&ActivationEvent {
            state: ActivationState::Inactive,
            cause: ActivationCause::PointerMove,
            mobile: false,
        });
        rec.on_pass_begin(&PassBeginEvent {
            generation: 3,
            tracked: 2,
        });
        rec.on_unbind(&UnbindEvent {
            generation: 3,
            proxy: ProxyId(1),
        });
        rec.on_dispatch(&DispatchEvent {
            proxy: ProxyId(1),
            event: CanonicalEvent::MouseOver,
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "activation");
        assert_eq!(parsed[0]["args"]["state"], "inactive");
        assert_eq!(parsed[0]["args"]["cause"], "PointerMove");

        assert_eq!(parsed[1]["name"], "pass_begin");
        assert_eq!(parsed[1]["gen"], 3);
        assert_eq!(parsed[1]["args"]["tracked"], 2);

        assert_eq!(parsed[2]["name"], "unbind");
        assert_eq!(parsed[2]["args"]["proxy"], 1);

        assert_eq!(parsed[3]["args"]["event"], "mouseover");
        assert!(parsed[3].get("gen").is_none(), "dispatch has no generation");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty(), "empty recording exports an empty array");
    }
}
