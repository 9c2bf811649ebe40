// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-free host implementations.
//!
//! These back a [`LiveSession`](crate::session::LiveSession) without a map
//! widget: for replaying captures, for servers that only track presence, and
//! for tests.

use std::collections::BTreeMap;

use tyria_core::backend::{History, MarkerPresenter, Viewport};
use tyria_core::geo::LatLng;
use tyria_core::live::{CharacterKey, LiveMarker, MarkerChanges};

/// A [`Viewport`] whose renderables are layer names.
#[derive(Clone, Debug)]
pub struct HeadlessViewport {
    zoom: i32,
    min_zoom: i32,
    max_zoom: i32,
    center: LatLng,
    shown: BTreeMap<String, f32>,
}

impl HeadlessViewport {
    /// Creates a viewport at `zoom` with the given global bounds.
    #[must_use]
    pub fn new(zoom: i32, min_zoom: i32, max_zoom: i32) -> Self {
        Self {
            zoom: zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            center: LatLng::default(),
            shown: BTreeMap::new(),
        }
    }

    /// Moves to `zoom` within the global bounds, as a user zoom would.
    pub fn zoom_to(&mut self, zoom: i32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Returns the opacity of a shown layer.
    #[must_use]
    pub fn opacity(&self, layer: &str) -> Option<f32> {
        self.shown.get(layer).copied()
    }

    /// Iterates shown layer names in order.
    pub fn shown(&self) -> impl Iterator<Item = &str> {
        self.shown.keys().map(String::as_str)
    }
}

impl Viewport for HeadlessViewport {
    type Renderable = String;

    fn add_layer(&mut self, layer: &String) {
        self.shown.entry(layer.clone()).or_insert(1.0);
    }

    fn remove_layer(&mut self, layer: &String) {
        self.shown.remove(layer);
    }

    fn has_layer(&self, layer: &String) -> bool {
        self.shown.contains_key(layer)
    }

    fn set_opacity(&mut self, layer: &String, opacity: f32) {
        if let Some(value) = self.shown.get_mut(layer) {
            *value = opacity;
        }
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
        self.zoom_to(zoom);
    }
}

/// A [`History`] that keeps only the current fragment.
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    fragment: Option<String>,
    replacements: usize,
}

impl MemoryHistory {
    /// Returns the current fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns how many times the fragment was replaced.
    #[must_use]
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl History for MemoryHistory {
    fn replace_fragment(&mut self, fragment: &str) {
        self.fragment = Some(fragment.to_owned());
        self.replacements += 1;
    }
}

/// A [`MarkerPresenter`] that keeps the current markers in a table.
#[derive(Clone, Debug, Default)]
pub struct MarkerTable {
    markers: BTreeMap<CharacterKey, LiveMarker>,
    applied: usize,
}

impl MarkerTable {
    /// Returns the marker for `key`.
    #[must_use]
    pub fn get(&self, key: &CharacterKey) -> Option<&LiveMarker> {
        self.markers.get(key)
    }

    /// Iterates markers in key order.
    pub fn iter(&self) -> impl Iterator<Item = &LiveMarker> {
        self.markers.values()
    }

    /// Returns the number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns whether the overlay is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Returns how many change sets were applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl MarkerPresenter for MarkerTable {
    fn apply(&mut self, changes: &MarkerChanges) {
        for key in &changes.removed {
            self.markers.remove(key);
        }
        for marker in &changes.upserted {
            self.markers.insert(marker.key.clone(), marker.clone());
        }
        self.applied += 1;
    }
}
