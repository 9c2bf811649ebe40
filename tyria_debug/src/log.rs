// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding of engine events into `tracing`.
//!
//! Recoverable problems (duplicate layers, unknown chat links, malformed
//! messages) are logged at `WARN`. Layer and topic changes are `DEBUG`;
//! per-message and per-redraw events are `TRACE`.

use tracing::{debug, trace, warn};
use tyria_core::trace::{
    LayerRegisteredEvent, LayerStateEvent, MessageEvent, RedrawEvent, TraceSink, VisibilityEvent,
};

/// A [`TraceSink`] that emits `tracing` events under the `tyria` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn on_layer_registered(&mut self, e: &LayerRegisteredEvent<'_>) {
        debug!(target: "tyria::layer", id = e.id, state = ?e.state, attached = e.attached, "layer registered");
    }

    fn on_duplicate_layer(&mut self, id: &str) {
        warn!(target: "tyria::layer", id, "attempted to register duplicate layer");
    }

    fn on_layer_unregistered(&mut self, id: &str) {
        debug!(target: "tyria::layer", id, "layer unregistered");
    }

    fn on_layer_state(&mut self, e: &LayerStateEvent<'_>) {
        debug!(
            target: "tyria::layer",
            id = e.id,
            from = ?e.from,
            to = ?e.to,
            cause = ?e.cause,
            "layer state changed"
        );
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        trace!(target: "tyria::layer", zoom = e.zoom, shown = e.shown, hidden = e.hidden, "visibility evaluated");
    }

    fn on_unknown_chat_link(&mut self, code: &str) {
        warn!(target: "tyria::view", code, "failed to find marker from chat link");
    }

    fn on_message(&mut self, e: &MessageEvent<'_>) {
        trace!(
            target: "tyria::live",
            kind = ?e.kind,
            key = %e.key,
            created = e.created,
            "message applied"
        );
    }

    fn on_malformed_message(&mut self, topic: &str, reason: &str) {
        warn!(target: "tyria::live", topic, reason, "dropped malformed message");
    }

    fn on_evicted(&mut self, count: usize) {
        debug!(target: "tyria::live", count, "evicted stale characters");
    }

    fn on_redraw(&mut self, e: &RedrawEvent) {
        trace!(target: "tyria::live", upserted = e.upserted, removed = e.removed, "markers redrawn");
    }

    fn on_topic_changed(&mut self, old: Option<&str>, new: Option<&str>) {
        debug!(target: "tyria::live", old = old.unwrap_or("-"), new = new.unwrap_or("-"), "topic changed");
    }

    fn on_subscribe_failed(&mut self, topic: &str, reason: &str) {
        warn!(target: "tyria::live", topic, reason, "subscription refused");
    }
}
