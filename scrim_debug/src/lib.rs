// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug and diagnostic tools for scrim.
//!
//! This crate provides [`TraceSink`](scrim_core::trace::TraceSink)
//! implementations for inspecting overlay behavior:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output
//! - [`recorder::RecorderSink`]: in-memory event capture
//! - [`json::export`]: JSON export of recorded events

pub mod json;
pub mod pretty;
pub mod recorder;
