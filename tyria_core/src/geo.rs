// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map coordinates and the flat projection between world and view space.
//!
//! The game world is a flat pixel grid (continent coordinates, `y` growing
//! south). The viewport works in [`LatLng`] at a given zoom, where one world
//! pixel at the deepest zoom becomes `1 / 2^zoom` degrees. [`Projection`]
//! converts between the two, mirroring a "simple" CRS with a flipped y axis.

use kurbo::Point;

/// A view-space coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLng {
    /// Vertical coordinate (negative towards the south of the world).
    pub lat: f64,
    /// Horizontal coordinate.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Flat projection between continent coordinates and [`LatLng`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Zoom level at which one world unit equals one view pixel.
    pub zoom: i32,
}

impl Projection {
    /// Creates a projection anchored at `zoom`.
    #[inline]
    #[must_use]
    pub const fn new(zoom: i32) -> Self {
        Self { zoom }
    }

    /// Converts a world coordinate into view space.
    #[must_use]
    pub fn unproject(self, point: Point) -> LatLng {
        let scale = scale(self.zoom);
        LatLng {
            lat: -point.y / scale,
            lng: point.x / scale,
        }
    }

    /// Converts a view-space coordinate back into world space.
    #[must_use]
    pub fn project(self, lat_lng: LatLng) -> Point {
        let scale = scale(self.zoom);
        Point::new(lat_lng.lng * scale, -lat_lng.lat * scale)
    }
}

/// Returns `2^zoom`, exactly, saturating to `0` and `inf` far outside any
/// map's zoom range.
fn scale(zoom: i32) -> f64 {
    libm::ldexp(1.0, zoom)
}
