// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording viewport used by unit tests across the crate.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::backend::Viewport;
use crate::geo::LatLng;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Add(u32),
    Remove(u32),
    Opacity(u32, f32),
    View(LatLng, i32),
}

#[derive(Debug)]
pub(crate) struct TestViewport {
    pub(crate) zoom: i32,
    pub(crate) min_zoom: i32,
    pub(crate) max_zoom: i32,
    pub(crate) center: LatLng,
    pub(crate) shown: BTreeSet<u32>,
    pub(crate) opacity: BTreeMap<u32, f32>,
    pub(crate) calls: Vec<Call>,
}

impl TestViewport {
    pub(crate) fn new(zoom: i32, min_zoom: i32, max_zoom: i32) -> Self {
        Self {
            zoom,
            min_zoom,
            max_zoom,
            center: LatLng::default(),
            shown: BTreeSet::new(),
            opacity: BTreeMap::new(),
            calls: Vec::new(),
        }
    }

    pub(crate) fn opacity_of(&self, layer: u32) -> Option<f32> {
        self.opacity.get(&layer).copied()
    }
}

impl Viewport for TestViewport {
    type Renderable = u32;

    fn add_layer(&mut self, layer: &u32) {
        self.shown.insert(*layer);
        self.calls.push(Call::Add(*layer));
    }

    fn remove_layer(&mut self, layer: &u32) {
        self.shown.remove(layer);
        self.calls.push(Call::Remove(*layer));
    }

    fn has_layer(&self, layer: &u32) -> bool {
        self.shown.contains(layer)
    }

    fn set_opacity(&mut self, layer: &u32, opacity: f32) {
        self.opacity.insert(*layer, opacity);
        self.calls.push(Call::Opacity(*layer, opacity));
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
        self.zoom = zoom;
        self.calls.push(Call::View(center, zoom));
    }
}
