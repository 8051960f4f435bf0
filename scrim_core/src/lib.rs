// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessibility overlay engine for retained 2D scene graphs.
//!
//! A scene rendered into a single opaque surface is invisible to assistive
//! technology. `scrim_core` keeps a parallel layer of native focusable *proxy*
//! elements in step with the scene: one proxy per accessible, interactive,
//! visible node, positioned over the node's on-screen footprint and labelled
//! from its metadata. It is `no_std` compatible (with `alloc`); the native
//! tree and the renderer are reached through traits.
//!
//! # Architecture
//!
//! ```text
//!   OverlayBackend::poll_event ──► OverlayEngine::pump
//!                                     │          │
//!                  Tab / touch hook ◄─┘          └─► bridge ──► InteractionSink
//!                        │
//!                        ▼
//!   RenderHost (post-render) ──► OverlayEngine::update
//!                                     │
//!                 walk ──► bind / stamp ──► unbind stale ──► place
//!                                 │              │             │
//!                                 └──── ProxyPool ┘      geometry
//! ```
//!
//! **[`scene`]**: The [`SceneGraph`](scene::SceneGraph) read contract and
//! [`SceneStore`](scene::SceneStore), a struct-of-arrays reference scene with
//! generational handles.
//!
//! **[`walk`]**: Depth-first candidate discovery.
//!
//! **[`pool`]**: Recycling pool of native proxy elements.
//!
//! **[`geometry`]**: Scene geometry to viewport pixels, and label mirroring.
//!
//! **[`engine`]**: [`OverlayEngine`](engine::OverlayEngine), which owns the
//! pool and the shadow table and runs the reconciliation pass.
//!
//! **[`activation`]**: The inactive/active state machine and mobile mode.
//!
//! **[`bridge`]**: Proxy click/focus/blur to canonical pointer events.
//!
//! **[`backend`]**: The [`RenderHost`](backend::RenderHost) and
//! [`OverlayBackend`](backend::OverlayBackend) traits that platform crates
//! implement.
//!
//! **[`config`]**: [`OverlayConfig`](config::OverlayConfig) and
//! user-agent-derived [`HostQuirks`](config::HostQuirks).
//!
//! **[`headless`]**: In-memory host and backend for tests.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! engine instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod activation;
pub mod backend;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod headless;
pub mod pool;
pub mod scene;
pub mod trace;
pub mod walk;
