// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycling pool of native proxy elements.
//!
//! Proxies are constructed on demand through the [`OverlayBackend`] and never
//! destroyed during normal operation: [`release`](ProxyPool::release) detaches
//! a proxy and parks it for the next [`acquire`](ProxyPool::acquire). The pool
//! therefore grows to the historical peak of concurrently exposed nodes and
//! never shrinks. Elements are destroyed only by
//! [`destroy_all`](ProxyPool::destroy_all) at engine teardown.
//!
//! Every slot ever constructed is either available or bound, so
//! `available() + bound == constructed()` holds at all times.

use alloc::string::String;
use alloc::vec::Vec;

use crate::backend::{LiveMode, OverlayBackend, ProxyId, ProxyStyle};

/// A pooled proxy element and the values last written to it.
///
/// The mirrored fields let the engine skip redundant writes, which are
/// expensive on some accessibility trees.
#[derive(Debug)]
pub struct Proxy<E, N> {
    pub(crate) element: E,
    pub(crate) bound: Option<N>,
    pub(crate) live_mode: LiveMode,
    pub(crate) title: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) tab_index: Option<i32>,
    idle: bool,
}

impl<E, N: Copy> Proxy<E, N> {
    /// Returns the native element.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Returns the scene node this proxy currently stands in for.
    #[must_use]
    pub fn bound(&self) -> Option<N> {
        self.bound
    }

    /// Returns the current `aria-live` mode.
    #[must_use]
    pub fn live_mode(&self) -> LiveMode {
        self.live_mode
    }

    /// Returns the title last written to the element.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the `aria-label` last written to the element.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the tab index last written to the element.
    #[must_use]
    pub fn tab_index(&self) -> Option<i32> {
        self.tab_index
    }

    /// Returns whether the proxy is parked in the pool.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.idle
    }
}

/// Owns every proxy element and recycles idle ones.
#[derive(Debug)]
pub struct ProxyPool<E, N> {
    proxies: Vec<Proxy<E, N>>,
    available: Vec<ProxyId>,
}

impl<E, N> Default for ProxyPool<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, N> ProxyPool<E, N> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            proxies: Vec::new(),
            available: Vec::new(),
        }
    }

    /// Returns the number of proxies ever constructed.
    #[must_use]
    pub fn constructed(&self) -> usize {
        self.proxies.len()
    }

    /// Returns the number of idle proxies.
    #[must_use]
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// Returns whether `id` is idle in the pool.
    #[must_use]
    pub fn is_available(&self, id: ProxyId) -> bool {
        self.get(id).is_some_and(|p| p.idle)
    }

    /// Returns the proxy for `id`.
    #[must_use]
    pub fn get(&self, id: ProxyId) -> Option<&Proxy<E, N>> {
        self.proxies.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: ProxyId) -> Option<&mut Proxy<E, N>> {
        self.proxies.get_mut(id.0 as usize)
    }

    /// Takes an idle proxy, or constructs one with `style`.
    ///
    /// Returns the proxy and whether it was recycled, or `None` if the backend
    /// could not construct a new element. A recycled proxy has its live-region
    /// mode restored to `style.live_mode`.
    pub fn acquire<B>(&mut self, backend: &mut B, style: &ProxyStyle) -> Option<(ProxyId, bool)>
    where
        B: OverlayBackend<Element = E>,
    {
        if let Some(id) = self.available.pop() {
            let proxy = &mut self.proxies[id.0 as usize];
            proxy.idle = false;
            if proxy.live_mode != style.live_mode {
                backend.set_live_mode(&proxy.element, style.live_mode);
                proxy.live_mode = style.live_mode;
            }
            return Some((id, true));
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "one proxy per exposed scene node; far below u32::MAX"
        )]
        let id = ProxyId(self.proxies.len() as u32);
        let element = backend.create_proxy(id, style)?;
        self.proxies.push(Proxy {
            element,
            bound: None,
            live_mode: style.live_mode,
            title: None,
            label: None,
            tab_index: None,
            idle: false,
        });
        Some((id, false))
    }

    /// Detaches `id` from the native tree and returns it to the pool.
    ///
    /// Releasing an idle or unknown proxy is a no-op.
    pub fn release<B>(&mut self, backend: &mut B, id: ProxyId)
    where
        B: OverlayBackend<Element = E>,
    {
        let Some(proxy) = self.proxies.get_mut(id.0 as usize) else {
            return;
        };
        if proxy.idle {
            return;
        }
        backend.detach_proxy(&proxy.element);
        proxy.bound = None;
        proxy.idle = true;
        self.available.push(id);
    }

    /// Destroys every proxy. Bound proxies must have been released first.
    pub fn destroy_all<B>(&mut self, backend: &mut B)
    where
        B: OverlayBackend<Element = E>,
    {
        debug_assert_eq!(
            self.available.len(),
            self.proxies.len(),
            "destroying a pool with bound proxies"
        );
        self.available.clear();
        for proxy in self.proxies.drain(..) {
            backend.destroy_proxy(proxy.element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LiveRelevant;
    use crate::headless::{HeadlessElement, HeadlessOverlay};

    const STYLE: ProxyStyle = ProxyStyle {
        debug: false,
        live_mode: LiveMode::Polite,
        relevant: LiveRelevant::Text,
    };

    #[test]
    fn acquire_constructs_then_recycles() {
        let mut backend = HeadlessOverlay::new();
        let mut pool = ProxyPool::<HeadlessElement, u32>::new();

        let (a, recycled) = pool.acquire(&mut backend, &STYLE).unwrap();
        assert!(!recycled);
        assert_eq!(pool.constructed(), 1);

        pool.release(&mut backend, a);
        assert!(pool.is_available(a));

        let (b, recycled) = pool.acquire(&mut backend, &STYLE).unwrap();
        assert!(recycled);
        assert_eq!(a, b, "idle proxy should be reused");
        assert_eq!(pool.constructed(), 1);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn double_release_is_noop() {
        let mut backend = HeadlessOverlay::new();
        let mut pool = ProxyPool::<HeadlessElement, u32>::new();

        let (a, _) = pool.acquire(&mut backend, &STYLE).unwrap();
        pool.release(&mut backend, a);
        pool.release(&mut backend, a);
        assert_eq!(pool.available(), 1);

        let (first, _) = pool.acquire(&mut backend, &STYLE).unwrap();
        let (second, recycled) = pool.acquire(&mut backend, &STYLE).unwrap();
        assert_ne!(first, second);
        assert!(!recycled, "a double release must not hand out one proxy twice");
    }

    #[test]
    fn idle_flag_tracks_pool_membership() {
        let mut backend = HeadlessOverlay::new();
        let mut pool = ProxyPool::<HeadlessElement, u32>::new();

        let ids: Vec<ProxyId> = (0..4)
            .map(|_| pool.acquire(&mut backend, &STYLE).unwrap().0)
            .collect();
        assert!(ids.iter().all(|&id| !pool.is_available(id)), "fresh proxies are bound");

        for &id in ids.iter().rev() {
            pool.release(&mut backend, id);
            pool.release(&mut backend, id);
        }
        assert_eq!(pool.available(), 4, "each proxy parked exactly once");
        assert!(ids.iter().all(|&id| pool.get(id).unwrap().is_idle()), "all idle");

        let (again, recycled) = pool.acquire(&mut backend, &STYLE).unwrap();
        assert!(recycled);
        assert!(!pool.is_available(again), "acquire clears the idle flag");
        assert!(!pool.is_available(ProxyId(99)), "unknown ids are not available");
    }

    #[test]
    fn recycled_proxy_restores_live_mode() {
        let mut backend = HeadlessOverlay::new();
        let mut pool = ProxyPool::<HeadlessElement, u32>::new();

        let (a, _) = pool.acquire(&mut backend, &STYLE).unwrap();
        let element = pool.get(a).map(|p| p.element().clone()).unwrap();
        backend.set_live_mode(&element, LiveMode::Assertive);
        pool.get_mut(a).unwrap().live_mode = LiveMode::Assertive;
        pool.release(&mut backend, a);

        let _ = pool.acquire(&mut backend, &STYLE).unwrap();
        assert_eq!(pool.get(a).unwrap().live_mode(), LiveMode::Polite);
        assert_eq!(backend.element(a).unwrap().live_mode, LiveMode::Polite);
    }

    #[test]
    fn destroy_all_releases_native_elements() {
        let mut backend = HeadlessOverlay::new();
        let mut pool = ProxyPool::<HeadlessElement, u32>::new();

        let (a, _) = pool.acquire(&mut backend, &STYLE).unwrap();
        let (b, _) = pool.acquire(&mut backend, &STYLE).unwrap();
        pool.release(&mut backend, a);
        pool.release(&mut backend, b);
        pool.destroy_all(&mut backend);

        assert_eq!(pool.constructed(), 0);
        assert!(backend.element(a).unwrap().destroyed);
        assert!(backend.element(b).unwrap().destroyed);
    }
}
