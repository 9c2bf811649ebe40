// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM presenter for the live overlay.
//!
//! Applies [`MarkerChanges`] to a set of absolutely positioned `<div>`s, one
//! per character, inside the live overlay element.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;

use tyria_core::backend::MarkerPresenter;
use tyria_core::live::{CharacterKey, LiveMarker, MarkerChanges, MarkerIcon};
use wasm_bindgen::JsCast as _;
use web_sys::HtmlElement;

/// Maps live markers to DOM elements.
pub struct DomMarkerPresenter {
    overlay: HtmlElement,
    elements: BTreeMap<CharacterKey, HtmlElement>,
}

impl core::fmt::Debug for DomMarkerPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomMarkerPresenter")
            .field("overlay", &"HtmlElement")
            .field("elements_len", &self.elements.len())
            .finish()
    }
}

impl DomMarkerPresenter {
    /// Creates a presenter drawing into `overlay`, the element registered as
    /// the live layer.
    #[must_use]
    pub fn new(overlay: HtmlElement) -> Self {
        Self {
            overlay,
            elements: BTreeMap::new(),
        }
    }

    /// Returns the overlay element.
    #[must_use]
    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }

    /// Returns the element drawn for `key`.
    #[must_use]
    pub fn element(&self, key: &CharacterKey) -> Option<&HtmlElement> {
        self.elements.get(key)
    }

    fn create_element(&self) -> Option<HtmlElement> {
        let doc = self.overlay.owner_document()?;
        let el: HtmlElement = doc.create_element("div").ok()?.unchecked_into();
        let s = el.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("left", "0");
        let _ = s.set_property("top", "0");
        let _ = s.set_property("transform-origin", "50% 50%");
        let _ = self.overlay.append_child(&el);
        Some(el)
    }
}

impl MarkerPresenter for DomMarkerPresenter {
    fn apply(&mut self, changes: &MarkerChanges) {
        // 1. Removals
        for key in &changes.removed {
            if let Some(el) = self.elements.remove(key) {
                el.remove();
            }
        }

        // 2. Upserts
        for marker in &changes.upserted {
            let el = match self.elements.get(&marker.key) {
                Some(el) => el.clone(),
                None => {
                    let Some(el) = self.create_element() else {
                        continue;
                    };
                    el.set_title(&format!("{}", marker.key));
                    self.elements.insert(marker.key.clone(), el.clone());
                    el
                }
            };
            el.set_class_name(&icon_class(marker.icon));
            apply_css_position(&el, marker);
        }
    }
}

/// Places a marker at its view-space position with its heading.
fn apply_css_position(el: &HtmlElement, marker: &LiveMarker) {
    let css = format!(
        "translate({}px,{}px) rotate({}deg)",
        marker.lat_lng.lng, -marker.lat_lng.lat, marker.rotation
    );
    let _ = el.style().set_property("transform", &css);
}

fn icon_class(icon: MarkerIcon) -> String {
    match icon {
        MarkerIcon::Commander => String::from("live-marker commander"),
        MarkerIcon::Mount(mount) => format!("live-marker mount-{mount:?}").to_lowercase(),
        MarkerIcon::Profession(profession) => {
            format!("live-marker profession-{profession:?}").to_lowercase()
        }
    }
}
