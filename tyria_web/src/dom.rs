// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-backed [`Viewport`].
//!
//! Every overlay is an `HtmlElement` that is a direct child of the map
//! container while shown. The view itself is a CSS transform on the
//! container, in view-space units scaled by `2^zoom`.

use alloc::format;

use tyria_core::backend::Viewport;
use tyria_core::geo::{LatLng, Projection};
use web_sys::HtmlElement;

/// A [`Viewport`] over a container element.
pub struct DomViewport {
    container: HtmlElement,
    zoom: i32,
    min_zoom: i32,
    max_zoom: i32,
    center: LatLng,
}

impl core::fmt::Debug for DomViewport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomViewport")
            .field("container", &"HtmlElement")
            .field("zoom", &self.zoom)
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("center", &self.center)
            .finish()
    }
}

impl DomViewport {
    /// Creates a viewport managing children of `container`, limited to
    /// `min_zoom..=max_zoom`.
    #[must_use]
    pub fn new(container: HtmlElement, min_zoom: i32, max_zoom: i32) -> Self {
        let viewport = Self {
            container,
            zoom: min_zoom,
            min_zoom,
            max_zoom,
            center: LatLng::default(),
        };
        viewport.apply_transform();
        viewport
    }

    /// Returns the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    fn apply_transform(&self) {
        let scale = Projection::new(self.zoom).project(LatLng::new(0.0, 1.0)).x;
        let css = format!(
            "scale({scale}) translate({}px,{}px)",
            -self.center.lng, self.center.lat
        );
        let s = self.container.style();
        let _ = s.set_property("transform-origin", "0 0");
        let _ = s.set_property("transform", &css);
    }
}

impl Viewport for DomViewport {
    type Renderable = HtmlElement;

    fn add_layer(&mut self, layer: &HtmlElement) {
        if !self.has_layer(layer) {
            let _ = self.container.append_child(layer);
        }
    }

    fn remove_layer(&mut self, layer: &HtmlElement) {
        if self.has_layer(layer) {
            let _ = self.container.remove_child(layer);
        }
    }

    fn has_layer(&self, layer: &HtmlElement) -> bool {
        layer
            .parent_element()
            .is_some_and(|parent| parent == *self.container)
    }

    fn set_opacity(&mut self, layer: &HtmlElement, opacity: f32) {
        let _ = layer
            .style()
            .set_property("opacity", &format!("{}", opacity.clamp(0.0, 1.0)));
    }

    fn zoom(&self) -> i32 {
        self.zoom
    }

    fn min_zoom(&self) -> i32 {
        self.min_zoom
    }

    fn max_zoom(&self) -> i32 {
        self.max_zoom
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn set_view(&mut self, center: LatLng, zoom: i32) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.apply_transform();
    }
}
