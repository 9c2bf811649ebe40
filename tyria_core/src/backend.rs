// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for map integrations.
//!
//! The engine never touches a map widget directly. Each host (a DOM map, a
//! native canvas, a headless test harness) provides the following pieces:
//!
//! - **Viewport**: Implements [`Viewport`] to add, remove and fade the
//!   opaque renderables the registry hands it, and to report the current
//!   view. The registry owns the viewport handle it is attached to; there is
//!   no ambient global map object.
//!
//! - **History**: Implements [`History`] so the
//!   [`ViewportController`](crate::view::ViewportController) can keep the
//!   address bar in sync with the view without flooding navigation history.
//!
//! - **Marker presenter**: Implements [`MarkerPresenter`] to apply
//!   [`MarkerChanges`] to whatever renderable backs the live overlay.
//!
//! - **Marker lookup**: Implements [`MarkerLookup`] to resolve chat links to
//!   world coordinates.
//!
//! # Data flow
//!
//! ```rust,ignore
//! fn on_zoom_end(controller: &mut ViewportController<H>, registry: &mut LayerRegistry<V>) {
//!     // Show/hide/fade every overlay for the new zoom, then rewrite the URL.
//!     controller.on_zoom_end(registry);
//! }
//!
//! fn on_publish(markers: &mut LiveMarkerStore, presenter: &mut P, publish: &Publish, now: Timestamp) {
//!     // Malformed payloads are traced and dropped.
//!     if markers.on_payload(&publish.topic, &publish.payload, now).is_ok() {
//!         presenter.apply(&markers.redraw());
//!     }
//! }
//! ```

use kurbo::Point;

use crate::geo::LatLng;
use crate::live::MarkerChanges;

/// The map surface that registered layers are drawn on.
///
/// Renderables are opaque to the engine: it only ever adds, removes, queries
/// and fades them.
pub trait Viewport {
    /// Handle to one drawable overlay.
    type Renderable;

    /// Adds a renderable to the map.
    fn add_layer(&mut self, layer: &Self::Renderable);

    /// Removes a renderable from the map.
    fn remove_layer(&mut self, layer: &Self::Renderable);

    /// Returns whether the renderable is currently on the map.
    fn has_layer(&self, layer: &Self::Renderable) -> bool;

    /// Sets the opacity of a renderable, in `[0, 1]`.
    fn set_opacity(&mut self, layer: &Self::Renderable, opacity: f32);

    /// Current integer zoom level.
    fn zoom(&self) -> i32;

    /// Lowest zoom level the map allows.
    fn min_zoom(&self) -> i32;

    /// Highest zoom level the map allows.
    fn max_zoom(&self) -> i32;

    /// Current view center.
    fn center(&self) -> LatLng;

    /// Moves the view.
    fn set_view(&mut self, center: LatLng, zoom: i32);
}

/// The navigable address of the page.
pub trait History {
    /// Replaces the fragment of the current history entry without pushing a
    /// new one.
    fn replace_fragment(&mut self, fragment: &str);
}

/// Applies recomputed live markers to the live overlay.
pub trait MarkerPresenter {
    /// Applies the given [`MarkerChanges`] to the backing overlay.
    fn apply(&mut self, changes: &MarkerChanges);
}

/// Resolves chat-link codes to world coordinates.
pub trait MarkerLookup {
    /// Returns the world coordinate of the marker identified by `code`.
    fn marker_by_chat_link(&self, code: &str) -> Option<Point>;
}
