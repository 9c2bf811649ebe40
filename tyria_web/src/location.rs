// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Address-bar integration.

use alloc::format;
use alloc::string::String;

use tyria_core::backend::History;
use wasm_bindgen::JsValue;

/// A [`History`] that rewrites the fragment of the current entry with
/// `history.replaceState`, so panning never adds back-button entries.
pub struct BrowserHistory {
    history: web_sys::History,
    location: web_sys::Location,
}

impl core::fmt::Debug for BrowserHistory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BrowserHistory")
            .field("fragment", &self.fragment())
            .finish_non_exhaustive()
    }
}

impl BrowserHistory {
    /// Binds to the global window. Returns `None` outside a browser.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self {
            history: window.history().ok()?,
            location: window.location(),
        })
    }

    /// Current fragment without the leading `#`, if non-empty.
    #[must_use]
    pub fn fragment(&self) -> Option<String> {
        let hash = self.location.hash().ok()?;
        let fragment = hash.strip_prefix('#').unwrap_or(&hash);
        (!fragment.is_empty()).then(|| String::from(fragment))
    }

    /// Chat link carried in the path under `route`, e.g. `/tyria/[&BDgAAAA=]`.
    #[must_use]
    pub fn chat_link(&self, route: &str) -> Option<String> {
        let path = self.location.pathname().ok()?;
        chat_link_from_path(&path, route)
    }
}

impl History for BrowserHistory {
    fn replace_fragment(&mut self, fragment: &str) {
        let url = format!("#{fragment}");
        let _ = self
            .history
            .replace_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}

/// Extracts the path segment following `route` and decodes it with the
/// browser's `decodeURIComponent`. Malformed escapes yield `None`.
#[must_use]
pub fn chat_link_from_path(path: &str, route: &str) -> Option<String> {
    let raw = chat_link_segment(path, route)?;
    let decoded = String::from(js_sys::decode_uri_component(raw).ok()?);
    (!decoded.is_empty()).then_some(decoded)
}

/// Returns the raw, still-escaped path segment following `route`.
///
/// ```
/// use tyria_web::chat_link_segment;
///
/// assert_eq!(
///     chat_link_segment("/tyria/%5B%26BDgAAAA%3D%5D", "tyria"),
///     Some("%5B%26BDgAAAA%3D%5D")
/// );
/// assert_eq!(chat_link_segment("/tyria", "tyria"), None);
/// ```
#[must_use]
pub fn chat_link_segment<'a>(path: &'a str, route: &str) -> Option<&'a str> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|s| *s == route)?;
    segments.next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_follows_route() {
        assert_eq!(
            chat_link_segment("/tyria/%5B%26BDgAAAA%3D%5D", "tyria"),
            Some("%5B%26BDgAAAA%3D%5D")
        );
        assert_eq!(
            chat_link_segment("/app/tyria/[&BDgAAAA=]/", "tyria"),
            Some("[&BDgAAAA=]")
        );
        assert_eq!(chat_link_segment("//tyria//x", "tyria"), Some("x"));
    }

    #[test]
    fn missing_segments() {
        assert_eq!(chat_link_segment("/", "tyria"), None);
        assert_eq!(chat_link_segment("/wvw/1", "tyria"), None);
        assert_eq!(chat_link_segment("/tyria/", "tyria"), None);
    }
}
