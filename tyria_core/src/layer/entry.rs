// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer states, registration options and stored entries.

use alloc::collections::BTreeMap;
use alloc::string::String;

/// Visibility state of a registered layer.
///
/// `Enabled` and `Hidden` are driven by zoom evaluation. `Disabled` and
/// `Pinned` are sticky: only an explicit
/// [`set_layer_state`](super::LayerRegistry::set_layer_state) leaves them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerState {
    /// Shown while the zoom is within the layer's range.
    Enabled,
    /// Turned off by the user; never shown.
    Disabled,
    /// Out of zoom range; not shown until evaluation re-enables it.
    Hidden,
    /// Always shown, irrespective of zoom.
    Pinned,
}

impl LayerState {
    /// Returns whether zoom evaluation is allowed to change this state.
    #[inline]
    #[must_use]
    pub const fn is_sticky(self) -> bool {
        matches!(self, Self::Disabled | Self::Pinned)
    }
}

/// Caller-supplied description of a layer to register.
///
/// Built with [`LayerOptions::new`] and the `with_*` helpers:
///
/// ```
/// use tyria_core::layer::{LayerOptions, LayerState};
///
/// let labels = LayerOptions::new("region-labels", LayerState::Enabled)
///     .with_zoom_range(2, 5)
///     .with_opacity(5, 0.2)
///     .with_opacity(4, 0.6)
///     .with_friendly_name("Region Headings");
/// assert_eq!(labels.max_zoom, Some(5));
/// ```
#[derive(Clone, Debug)]
pub struct LayerOptions<R> {
    /// The drawable overlay.
    pub renderable: R,
    /// Lowest zoom the layer is shown at; the viewport minimum if absent.
    pub min_zoom: Option<i32>,
    /// Highest zoom the layer is shown at; the viewport maximum if absent.
    pub max_zoom: Option<i32>,
    /// Opacity for exact zoom levels; unlisted levels are fully opaque.
    pub opacity_by_zoom: BTreeMap<i32, f32>,
    /// Display name; the id if absent.
    pub friendly_name: Option<String>,
    /// Display icon.
    pub icon: Option<String>,
    /// Initial state.
    pub state: LayerState,
}

impl<R> LayerOptions<R> {
    /// Creates options with no zoom bounds and no opacity bands.
    #[must_use]
    pub fn new(renderable: R, state: LayerState) -> Self {
        Self {
            renderable,
            min_zoom: None,
            max_zoom: None,
            opacity_by_zoom: BTreeMap::new(),
            friendly_name: None,
            icon: None,
            state,
        }
    }

    /// Sets the lowest zoom the layer is shown at.
    #[must_use]
    pub fn with_min_zoom(mut self, zoom: i32) -> Self {
        self.min_zoom = Some(zoom);
        self
    }

    /// Sets the highest zoom the layer is shown at.
    #[must_use]
    pub fn with_max_zoom(mut self, zoom: i32) -> Self {
        self.max_zoom = Some(zoom);
        self
    }

    /// Sets both zoom bounds.
    #[must_use]
    pub fn with_zoom_range(self, min: i32, max: i32) -> Self {
        self.with_min_zoom(min).with_max_zoom(max)
    }

    /// Sets the opacity used at exactly `zoom`.
    #[must_use]
    pub fn with_opacity(mut self, zoom: i32, opacity: f32) -> Self {
        self.opacity_by_zoom.insert(zoom, opacity.clamp(0.0, 1.0));
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the display icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A registered layer.
#[derive(Clone, Debug)]
pub struct LayerEntry<R> {
    pub(crate) id: String,
    pub(crate) renderable: R,
    pub(crate) min_zoom: Option<i32>,
    pub(crate) max_zoom: Option<i32>,
    pub(crate) opacity_by_zoom: BTreeMap<i32, f32>,
    pub(crate) friendly_name: String,
    pub(crate) icon: Option<String>,
    pub(crate) state: LayerState,
}

impl<R> LayerEntry<R> {
    pub(crate) fn new(id: String, options: LayerOptions<R>) -> Self {
        let friendly_name = options.friendly_name.unwrap_or_else(|| id.clone());
        Self {
            id,
            renderable: options.renderable,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
            opacity_by_zoom: options.opacity_by_zoom,
            friendly_name,
            icon: options.icon,
            state: options.state,
        }
    }

    /// Returns the layer id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current renderable.
    #[must_use]
    pub fn renderable(&self) -> &R {
        &self.renderable
    }

    /// Returns the configured lower zoom bound.
    #[must_use]
    pub fn min_zoom(&self) -> Option<i32> {
        self.min_zoom
    }

    /// Returns the configured upper zoom bound.
    #[must_use]
    pub fn max_zoom(&self) -> Option<i32> {
        self.max_zoom
    }

    /// Returns the display name.
    #[must_use]
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    /// Returns the display icon.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> LayerState {
        self.state
    }

    /// Returns whether `zoom` lies in `[min, max]`, substituting `bounds` for
    /// absent limits.
    #[must_use]
    pub fn within(&self, zoom: i32, bounds: (i32, i32)) -> bool {
        let min = self.min_zoom.unwrap_or(bounds.0);
        let max = self.max_zoom.unwrap_or(bounds.1);
        zoom >= min && zoom <= max
    }

    /// Returns the opacity for `zoom`. Exact matches only; anything else is 1.
    #[must_use]
    pub fn opacity_at(&self, zoom: i32) -> f32 {
        self.opacity_by_zoom.get(&zoom).copied().unwrap_or(1.0)
    }

    /// Returns whether an opacity band is configured at all.
    #[must_use]
    pub fn has_opacity_bands(&self) -> bool {
        !self.opacity_by_zoom.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_name_defaults_to_id() {
        let entry = LayerEntry::new("waypoints".into(), LayerOptions::new((), LayerState::Enabled));
        assert_eq!(entry.friendly_name(), "waypoints");

        let named = LayerEntry::new(
            "vista".into(),
            LayerOptions::new((), LayerState::Enabled).with_friendly_name("Vistas"),
        );
        assert_eq!(named.friendly_name(), "Vistas");
    }

    #[test]
    fn opacity_is_exact_match_only() {
        let entry = LayerEntry::new(
            "labels".into(),
            LayerOptions::new((), LayerState::Enabled)
                .with_opacity(5, 0.2)
                .with_opacity(4, 0.6),
        );
        assert_eq!(entry.opacity_at(5), 0.2);
        assert_eq!(entry.opacity_at(4), 0.6);
        assert_eq!(entry.opacity_at(3), 1.0, "no interpolation between bands");
        assert_eq!(entry.opacity_at(6), 1.0);
    }

    #[test]
    fn absent_bounds_fall_back() {
        let entry = LayerEntry::new(
            "waypoints".into(),
            LayerOptions::new((), LayerState::Enabled).with_min_zoom(5),
        );
        assert!(!entry.within(4, (0, 7)));
        assert!(entry.within(5, (0, 7)));
        assert!(entry.within(7, (0, 7)));
        assert!(!entry.within(8, (0, 7)));
    }

    #[test]
    fn sticky_states() {
        assert!(LayerState::Disabled.is_sticky());
        assert!(LayerState::Pinned.is_sticky());
        assert!(!LayerState::Enabled.is_sticky());
        assert!(!LayerState::Hidden.is_sticky());
    }
}
