// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer registration, hot-swapping and explicit state toggles.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use core::mem;

use super::entry::{LayerEntry, LayerOptions, LayerState};
use crate::backend::Viewport;
use crate::trace::{LayerRegisteredEvent, LayerStateEvent, StateCause, Tracer};

/// Named overlays and their visibility policies.
///
/// Entries are keyed by id and iterated in id order. The registry owns the
/// [`Viewport`] it is attached to; until one is attached, state changes are
/// tracked but nothing is drawn.
pub struct LayerRegistry<V: Viewport> {
    pub(crate) entries: BTreeMap<String, LayerEntry<V::Renderable>>,
    pub(crate) viewport: Option<V>,
    pub(crate) tracer: Tracer,
}

impl<V: Viewport> fmt::Debug for LayerRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRegistry")
            .field("layers", &self.entries.keys().collect::<alloc::vec::Vec<_>>())
            .field("attached", &self.viewport.is_some())
            .finish_non_exhaustive()
    }
}

impl<V: Viewport> Default for LayerRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Viewport> LayerRegistry<V> {
    /// Creates an empty registry with no viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            viewport: None,
            tracer: Tracer::none(),
        }
    }

    /// Creates an empty registry attached to `viewport`.
    #[must_use]
    pub fn with_viewport(viewport: V) -> Self {
        let mut registry = Self::new();
        registry.attach_viewport(viewport);
        registry
    }

    /// Routes diagnostics to `tracer`.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Attaches a viewport, returning the previously attached one.
    ///
    /// Every layer that is not `Disabled` is added to the new viewport, then
    /// visibility is evaluated at its current zoom.
    pub fn attach_viewport(&mut self, mut viewport: V) -> Option<V> {
        for entry in self.entries.values() {
            if entry.state != LayerState::Disabled && !viewport.has_layer(&entry.renderable) {
                viewport.add_layer(&entry.renderable);
            }
        }
        let zoom = viewport.zoom();
        let previous = self.viewport.replace(viewport);
        self.evaluate_visibility(zoom);
        previous
    }

    /// Returns the attached viewport.
    #[must_use]
    pub fn viewport(&self) -> Option<&V> {
        self.viewport.as_ref()
    }

    /// Returns the attached viewport mutably.
    pub fn viewport_mut(&mut self) -> Option<&mut V> {
        self.viewport.as_mut()
    }

    // -- Registration API --

    /// Registers a layer.
    ///
    /// A duplicate id is reported to the tracer and otherwise ignored; the
    /// first registration's renderable and metadata are kept. When a viewport
    /// is attached and the layer is not `Disabled`, its renderable is added
    /// right away and visibility is re-evaluated at the current zoom.
    pub fn register_layer(&mut self, id: impl Into<String>, options: LayerOptions<V::Renderable>) {
        let id = id.into();
        if self.entries.contains_key(&id) {
            self.tracer.duplicate_layer(&id);
            return;
        }

        let entry = LayerEntry::new(id.clone(), options);
        let state = entry.state;
        let mut attached = false;
        if let Some(viewport) = &mut self.viewport {
            if state != LayerState::Disabled {
                viewport.add_layer(&entry.renderable);
                attached = true;
            }
        }
        self.entries.insert(id.clone(), entry);
        self.tracer.layer_registered(&LayerRegisteredEvent {
            id: &id,
            state,
            attached,
        });

        if let Some(zoom) = self.current_zoom() {
            self.evaluate_visibility(zoom);
        }
    }

    /// Removes a layer and takes its renderable off the map. Unknown ids are
    /// ignored.
    pub fn unregister_layer(&mut self, id: &str) {
        let Some(entry) = self.entries.remove(id) else {
            return;
        };
        if let Some(viewport) = &mut self.viewport {
            if viewport.has_layer(&entry.renderable) {
                viewport.remove_layer(&entry.renderable);
            }
        }
        self.tracer.layer_unregistered(id);
    }

    /// Swaps the renderable of an existing layer, keeping its id, metadata
    /// and state. Unknown ids are ignored.
    ///
    /// If the old renderable is on the map, the new one is added *before* the
    /// old one is removed so the overlay never blinks out.
    pub fn update_layer(&mut self, id: &str, renderable: V::Renderable) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        let old = mem::replace(&mut entry.renderable, renderable);
        let Some(viewport) = &mut self.viewport else {
            return;
        };
        if viewport.has_layer(&old) {
            viewport.add_layer(&entry.renderable);
            viewport.remove_layer(&old);
        }
        let zoom = viewport.zoom();
        self.apply_policy(id, zoom);
    }

    /// Sets a layer's state from an external toggle and applies the state's
    /// visibility policy immediately. Unknown ids are ignored.
    ///
    /// This is the only way into or out of `Disabled` and `Pinned`.
    pub fn set_layer_state(&mut self, id: &str, state: LayerState) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        let from = mem::replace(&mut entry.state, state);
        if from != state {
            self.tracer.layer_state(&LayerStateEvent {
                id,
                from,
                to: state,
                cause: StateCause::Explicit,
            });
        }
        if let Some(zoom) = self.current_zoom() {
            self.apply_policy(id, zoom);
        }
    }

    // -- Queries (side-effect free) --

    /// Returns whether a layer with this id is registered.
    #[must_use]
    pub fn has_layer(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns whether `zoom` is within the layer's range. Unknown ids are
    /// never in range.
    #[must_use]
    pub fn within_zoom_range(&self, id: &str, zoom: i32) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| entry.within(zoom, self.zoom_bounds()))
    }

    /// Returns the entry for `id`.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&LayerEntry<V::Renderable>> {
        self.entries.get(id)
    }

    /// Returns the state of `id`.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<LayerState> {
        self.entries.get(id).map(LayerEntry::state)
    }

    /// Returns whether the layer's renderable is currently on the map.
    #[must_use]
    pub fn is_shown(&self, id: &str) -> bool {
        match (self.entries.get(id), &self.viewport) {
            (Some(entry), Some(viewport)) => viewport.has_layer(&entry.renderable),
            _ => false,
        }
    }

    /// Iterates all entries in id order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerEntry<V::Renderable>> {
        self.entries.values()
    }

    /// Returns the number of registered layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no layers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -- Internal helpers --

    /// Global zoom bounds used for absent per-layer limits.
    pub(crate) fn zoom_bounds(&self) -> (i32, i32) {
        match &self.viewport {
            Some(viewport) => (viewport.min_zoom(), viewport.max_zoom()),
            None => (i32::MIN, i32::MAX),
        }
    }

    pub(crate) fn current_zoom(&self) -> Option<i32> {
        self.viewport.as_ref().map(Viewport::zoom)
    }
}
