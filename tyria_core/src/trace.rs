// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for the layer engine and the live pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! registry, the viewport controller, the marker store and the runtime call
//! as things happen. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional shared sink. Every component that reports
//! diagnostics holds a clone of the same `Tracer`, so a single sink observes
//! the whole pipeline in arrival order. When the `trace` feature is **off**,
//! every `Tracer` method compiles to nothing. When **on**, each method
//! performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::layer::LayerState;
use crate::live::{CharacterKey, MessageKind};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What caused a layer state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateCause {
    /// Zoom evaluation moved the layer between `Enabled` and `Hidden`.
    Zoom,
    /// An external toggle (e.g. a layer checkbox).
    Explicit,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layer is stored in the registry.
#[derive(Clone, Copy, Debug)]
pub struct LayerRegisteredEvent<'a> {
    /// Layer id.
    pub id: &'a str,
    /// State the layer was registered with.
    pub state: LayerState,
    /// Whether the renderable was added to an attached viewport.
    pub attached: bool,
}

/// Emitted when a layer's state changes.
#[derive(Clone, Copy, Debug)]
pub struct LayerStateEvent<'a> {
    /// Layer id.
    pub id: &'a str,
    /// Previous state.
    pub from: LayerState,
    /// New state.
    pub to: LayerState,
    /// What caused the change.
    pub cause: StateCause,
}

/// Emitted after every visibility evaluation.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityEvent {
    /// Zoom level evaluated.
    pub zoom: i32,
    /// Number of layers shown after evaluation.
    pub shown: usize,
    /// Number of layers not shown after evaluation.
    pub hidden: usize,
}

/// Emitted when an inbound live message has been applied.
#[derive(Clone, Copy, Debug)]
pub struct MessageEvent<'a> {
    /// Message discriminant.
    pub kind: MessageKind,
    /// Character the message was about.
    pub key: &'a CharacterKey,
    /// Whether the message created a new entry.
    pub created: bool,
}

/// Emitted when the marker overlay was recomputed.
#[derive(Clone, Copy, Debug)]
pub struct RedrawEvent {
    /// Markers added or moved.
    pub upserted: usize,
    /// Markers taken off the overlay.
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layer is registered.
    fn on_layer_registered(&mut self, e: &LayerRegisteredEvent<'_>) {
        _ = e;
    }

    /// Called when a registration is rejected because the id is taken.
    fn on_duplicate_layer(&mut self, id: &str) {
        _ = id;
    }

    /// Called when a layer is removed from the registry.
    fn on_layer_unregistered(&mut self, id: &str) {
        _ = id;
    }

    /// Called when a layer changes state.
    fn on_layer_state(&mut self, e: &LayerStateEvent<'_>) {
        _ = e;
    }

    /// Called after a visibility evaluation.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called when a chat link did not resolve to a marker.
    fn on_unknown_chat_link(&mut self, code: &str) {
        _ = code;
    }

    /// Called after an inbound live message was applied.
    fn on_message(&mut self, e: &MessageEvent<'_>) {
        _ = e;
    }

    /// Called when an inbound payload could not be decoded.
    fn on_malformed_message(&mut self, topic: &str, reason: &str) {
        _ = (topic, reason);
    }

    /// Called when the freshness sweep removed entries.
    fn on_evicted(&mut self, count: usize) {
        _ = count;
    }

    /// Called after the live overlay was recomputed.
    fn on_redraw(&mut self, e: &RedrawEvent) {
        _ = e;
    }

    /// Called when the subscription topic changes.
    fn on_topic_changed(&mut self, old: Option<&str>, new: Option<&str>) {
        _ = (old, new);
    }

    /// Called when the transport refused a subscription.
    fn on_subscribe_failed(&mut self, topic: &str, reason: &str) {
        _ = (topic, reason);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// A sink shared between every component of one pipeline.
pub type SharedSink = Rc<RefCell<dyn TraceSink>>;

/// Thin, clonable wrapper around an optional shared [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Clone, Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<SharedSink>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: SharedSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Emits a [`LayerRegisteredEvent`].
    #[inline]
    pub fn layer_registered(&self, e: &LayerRegisteredEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_layer_registered(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a rejected duplicate registration.
    #[inline]
    pub fn duplicate_layer(&self, id: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_duplicate_layer(id);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = id;
        }
    }

    /// Reports a removed layer.
    #[inline]
    pub fn layer_unregistered(&self, id: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_layer_unregistered(id);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = id;
        }
    }

    /// Emits a [`LayerStateEvent`].
    #[inline]
    pub fn layer_state(&self, e: &LayerStateEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_layer_state(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisibilityEvent`].
    #[inline]
    pub fn visibility(&self, e: &VisibilityEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_visibility(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a chat link that matched no marker.
    #[inline]
    pub fn unknown_chat_link(&self, code: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_unknown_chat_link(code);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = code;
        }
    }

    /// Emits a [`MessageEvent`].
    #[inline]
    pub fn message(&self, e: &MessageEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_message(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a payload that failed to decode.
    #[inline]
    pub fn malformed_message(&self, topic: &str, reason: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_malformed_message(topic, reason);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (topic, reason);
        }
    }

    /// Reports entries removed by the freshness sweep.
    #[inline]
    pub fn evicted(&self, count: usize) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_evicted(count);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = count;
        }
    }

    /// Emits a [`RedrawEvent`].
    #[inline]
    pub fn redraw(&self, e: &RedrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_redraw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a topic change.
    #[inline]
    pub fn topic_changed(&self, old: Option<&str>, new: Option<&str>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_topic_changed(old, new);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (old, new);
        }
    }

    /// Reports a refused subscription.
    #[inline]
    pub fn subscribe_failed(&self, topic: &str, reason: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &self.sink {
            s.borrow_mut().on_subscribe_failed(topic, reason);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (topic, reason);
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct Collect {
        duplicates: Vec<String>,
        evicted: usize,
    }

    impl TraceSink for Collect {
        fn on_duplicate_layer(&mut self, id: &str) {
            self.duplicates.push(id.to_string());
        }

        fn on_evicted(&mut self, count: usize) {
            self.evicted += count;
        }
    }

    #[test]
    fn clones_share_one_sink() {
        let sink = Rc::new(RefCell::new(Collect::default()));
        let a = Tracer::new(sink.clone());
        let b = a.clone();
        a.duplicate_layer("core");
        b.evicted(3);
        b.evicted(1);

        let sink = sink.borrow();
        assert_eq!(sink.duplicates, ["core"]);
        assert_eq!(sink.evicted, 4, "both clones reach the same sink");
    }

    #[test]
    fn none_discards() {
        let tracer = Tracer::none();
        tracer.duplicate_layer("ignored");
        tracer.evicted(1);
    }
}
