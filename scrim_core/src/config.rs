// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration and host quirks.
//!
//! [`OverlayConfig`] is the caller-facing configuration. [`HostQuirks`]
//! captures behavior that depends on the host environment (which assistive
//! stack is announcing, whether input is touch-first) and is normally detected
//! by a backend rather than chosen by the caller.

use crate::backend::{LiveMode, LiveRelevant};

/// Caller-facing engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Render proxies visibly (semi-transparent fill plus a text dump of their
    /// metadata) for inspection.
    pub debug: bool,
}

/// Host-environment behavior switches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostQuirks {
    /// Initial `aria-live` mode for new proxies.
    ///
    /// [`LiveMode::Off`] on hosts whose accessibility tree already announces
    /// title changes, [`LiveMode::Polite`] elsewhere.
    pub live_mode: LiveMode,
    /// `aria-relevant` value for new proxies.
    pub relevant: LiveRelevant,
    /// Whether the host is touch-first, which enables the touch hook bootstrap.
    pub touch_capable: bool,
    /// Minimum time between reconciliation passes, in milliseconds.
    ///
    /// `None` reconciles on every post-render notification.
    pub update_interval_ms: Option<f64>,
}

impl Default for HostQuirks {
    fn default() -> Self {
        Self {
            live_mode: LiveMode::Polite,
            relevant: LiveRelevant::Text,
            touch_capable: false,
            update_interval_ms: None,
        }
    }
}

/// Reconciliation interval applied on Android hosts.
pub const ANDROID_UPDATE_INTERVAL_MS: f64 = 500.0;

impl HostQuirks {
    /// Derives quirks from a browser user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();

        let live_mode = if ua.contains("chrome") {
            LiveMode::Off
        } else {
            LiveMode::Polite
        };
        let relevant = if is_gecko(&ua) {
            LiveRelevant::Additions
        } else {
            LiveRelevant::Text
        };
        let android = ua.contains("android");
        let touch_capable = android
            || ua.contains("iphone")
            || ua.contains("ipad")
            || ua.contains("ipod")
            || ua.contains("mobile");

        Self {
            live_mode,
            relevant,
            touch_capable,
            update_interval_ms: android.then_some(ANDROID_UPDATE_INTERVAL_MS),
        }
    }
}

/// Matches the Gecko token `rv:<version>... Gecko/`.
fn is_gecko(ua: &str) -> bool {
    ua.find("rv:")
        .is_some_and(|rv| ua[rv..].contains("gecko/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const FIREFOX_DESKTOP: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
    const CHROME_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";

    #[test]
    fn chrome_desktop() {
        let q = HostQuirks::from_user_agent(CHROME_DESKTOP);
        assert_eq!(q.live_mode, LiveMode::Off);
        assert_eq!(q.relevant, LiveRelevant::Text, "WebKit's 'like Gecko' is not Gecko");
        assert!(!q.touch_capable);
        assert_eq!(q.update_interval_ms, None);
    }

    #[test]
    fn firefox_desktop() {
        let q = HostQuirks::from_user_agent(FIREFOX_DESKTOP);
        assert_eq!(q.live_mode, LiveMode::Polite);
        assert_eq!(q.relevant, LiveRelevant::Additions);
        assert!(!q.touch_capable);
    }

    #[test]
    fn iphone_is_touch_capable() {
        let q = HostQuirks::from_user_agent(SAFARI_IPHONE);
        assert_eq!(q.live_mode, LiveMode::Polite);
        assert!(q.touch_capable);
        assert_eq!(q.update_interval_ms, None);
    }

    #[test]
    fn android_is_throttled() {
        let q = HostQuirks::from_user_agent(CHROME_ANDROID);
        assert!(q.touch_capable);
        assert_eq!(q.update_interval_ms, Some(ANDROID_UPDATE_INTERVAL_MS));
    }
}
