// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of proxy interactions into canonical pointer events.
//!
//! Assistive technology activates and focuses the proxy elements; the rest of
//! the application only understands pointer events on scene nodes. The bridge
//! maps one onto the other:
//!
//! | proxy event | canonical events | live-region mode |
//! |---|---|---|
//! | click | `click`, `pointertap`, `tap` | unchanged |
//! | focus | `mouseover` | assertive |
//! | blur | `mouseout` | polite |
//!
//! The sink owns the event payload; the bridge only names the event and
//! substitutes the target.

use crate::backend::{LiveMode, ProxyEvent};

/// A pointer event understood by the interaction system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalEvent {
    /// `click`
    Click,
    /// `pointertap`
    PointerTap,
    /// `tap`
    Tap,
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
}

impl CanonicalEvent {
    /// Returns the event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::PointerTap => "pointertap",
            Self::Tap => "tap",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
        }
    }
}

/// Receives bridged events.
///
/// Implementations reuse whatever shared event-data object their dispatch
/// system already maintains; only the target and the event name vary.
pub trait InteractionSink<N> {
    /// Dispatches `event` with `target` as the event target.
    fn dispatch(&mut self, target: N, event: CanonicalEvent);

    /// Sets the root the next dispatches propagate from.
    fn set_root_target(&mut self, root: N) {
        _ = root;
    }
}

/// The outcome of bridging one proxy event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bridged {
    /// Events to dispatch, in order.
    pub events: &'static [CanonicalEvent],
    /// Live-region mode the proxy switches to, if any.
    pub live_mode: Option<LiveMode>,
}

/// Maps a native proxy event to its canonical events.
#[must_use]
pub const fn translate(event: ProxyEvent) -> Bridged {
    match event {
        ProxyEvent::Click => Bridged {
            events: &[
                CanonicalEvent::Click,
                CanonicalEvent::PointerTap,
                CanonicalEvent::Tap,
            ],
            live_mode: None,
        },
        ProxyEvent::Focus => Bridged {
            events: &[CanonicalEvent::MouseOver],
            live_mode: Some(LiveMode::Assertive),
        },
        ProxyEvent::Blur => Bridged {
            events: &[CanonicalEvent::MouseOut],
            live_mode: Some(LiveMode::Polite),
        },
    }
}
