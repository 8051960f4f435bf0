// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay activation state machine.
//!
//! The overlay is only live while the user appears to rely on assistive
//! navigation:
//!
//! ```text
//!             Tab key / touch hook focus
//!   Inactive ───────────────────────────► Active
//!      ▲                                     │
//!      └─────────────────────────────────────┘
//!        pointer moved / overlay emptied
//!        (never in mobile mode)
//! ```
//!
//! Activation through the touch hook sets *mobile mode*, which is sticky:
//! touch devices have no pointer-movement signal that distinguishes assistive
//! exploration from incidental touches.
//!
//! [`Activation`] only decides transitions. The entry actions (listener
//! swaps, post-render subscription, container attachment) are applied by
//! [`OverlayEngine`](crate::engine::OverlayEngine).

/// Whether the overlay is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActivationState {
    /// The overlay is detached and listens for the Tab key.
    #[default]
    Inactive,
    /// The overlay is attached, reconciles every frame and listens for
    /// pointer movement.
    Active,
}

/// Why a transition happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivationCause {
    /// The Tab key was pressed.
    TabKey,
    /// The touch hook element received focus.
    TouchHook,
    /// The pointer moved.
    PointerMove,
    /// A pass left nothing to expose.
    EmptyOverlay,
    /// The owner requested the transition.
    Explicit,
    /// The engine was torn down.
    Teardown,
}

/// Transition logic for the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Activation {
    state: ActivationState,
    mobile: bool,
}

impl Activation {
    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ActivationState {
        self.state
    }

    /// Returns whether the overlay is live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, ActivationState::Active)
    }

    /// Returns whether the sticky mobile mode is set.
    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Enters [`ActivationState::Active`]. Returns `false` if already active.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = ActivationState::Active;
        true
    }

    /// Enters [`ActivationState::Inactive`]. Returns `false` if already
    /// inactive or in mobile mode.
    pub fn deactivate(&mut self) -> bool {
        if !self.is_active() || self.mobile {
            return false;
        }
        self.state = ActivationState::Inactive;
        true
    }

    /// Sets the sticky mobile mode.
    pub fn enter_mobile(&mut self) {
        self.mobile = true;
    }

    /// Returns to the initial state regardless of mode. Returns whether the
    /// overlay was active.
    pub fn reset(&mut self) -> bool {
        let was_active = self.is_active();
        *self = Self::default();
        was_active
    }
}
