// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom-driven visibility evaluation.
//!
//! Evaluation runs in two passes over a snapshot of the registered ids:
//!
//! 1. **State pass**: every non-sticky entry becomes `Enabled` if the zoom
//!    is within its range, `Hidden` otherwise.
//! 2. **Policy pass**: every entry, sticky or not, is shown, hidden or faded
//!    on the attached viewport according to its state.

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use super::entry::LayerState;
use super::registry::LayerRegistry;
use crate::backend::Viewport;
use crate::trace::{LayerStateEvent, StateCause, VisibilityEvent};

impl<V: Viewport> LayerRegistry<V> {
    /// Recomputes automatic states for `zoom` and applies every entry's
    /// visibility policy.
    ///
    /// `Disabled` and `Pinned` entries keep their state. Without an attached
    /// viewport only the states are updated.
    pub fn evaluate_visibility(&mut self, zoom: i32) {
        let bounds = self.zoom_bounds();
        let ids: Vec<String> = self.entries.keys().cloned().collect();

        for id in &ids {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if entry.state.is_sticky() {
                continue;
            }
            let to = if entry.within(zoom, bounds) {
                LayerState::Enabled
            } else {
                LayerState::Hidden
            };
            let from = mem::replace(&mut entry.state, to);
            if from != to {
                self.tracer.layer_state(&LayerStateEvent {
                    id,
                    from,
                    to,
                    cause: StateCause::Zoom,
                });
            }
        }

        let mut shown = 0;
        for id in &ids {
            if self.apply_policy(id, zoom) {
                shown += 1;
            }
        }
        self.tracer.visibility(&VisibilityEvent {
            zoom,
            shown,
            hidden: ids.len() - shown,
        });
    }

    /// Applies the visibility policy of one entry's current state. Returns
    /// whether the entry is shown afterwards.
    pub(crate) fn apply_policy(&mut self, id: &str, zoom: i32) -> bool {
        let bounds = self.zoom_bounds();
        let (Some(entry), Some(viewport)) = (self.entries.get(id), self.viewport.as_mut()) else {
            return false;
        };
        let layer = &entry.renderable;
        let show = match entry.state {
            LayerState::Enabled => entry.within(zoom, bounds),
            LayerState::Pinned => true,
            LayerState::Hidden | LayerState::Disabled => false,
        };

        if !show {
            if viewport.has_layer(layer) {
                viewport.remove_layer(layer);
            }
            return false;
        }

        if !viewport.has_layer(layer) {
            viewport.add_layer(layer);
        }
        // Pinned layers keep whatever opacity their owner gave them unless a
        // band is configured.
        if entry.state == LayerState::Enabled || entry.has_opacity_bands() {
            viewport.set_opacity(layer, entry.opacity_at(zoom));
        }
        true
    }
}
