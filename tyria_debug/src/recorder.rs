// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON event recording.
//!
//! [`JsonRecorder`] implements [`TraceSink`] and keeps every event as a
//! [`serde_json::Value`] with an `event` discriminant. [`JsonRecorder::write_lines`]
//! writes them as JSON lines for offline inspection or diffing between runs.

use std::io::{self, Write};

use serde_json::{Value, json};
use tyria_core::trace::{
    LayerRegisteredEvent, LayerStateEvent, MessageEvent, RedrawEvent, TraceSink, VisibilityEvent,
};

/// A [`TraceSink`] that records events as JSON values.
#[derive(Debug, Default)]
pub struct JsonRecorder {
    events: Vec<Value>,
}

impl JsonRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<Value> {
        self.events
    }

    /// Writes one JSON object per line.
    pub fn write_lines(&self, writer: &mut dyn Write) -> io::Result<()> {
        for event in &self.events {
            serde_json::to_writer(&mut *writer, event)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl TraceSink for JsonRecorder {
    fn on_layer_registered(&mut self, e: &LayerRegisteredEvent<'_>) {
        self.events.push(json!({
            "event": "layer_registered",
            "id": e.id,
            "state": format!("{:?}", e.state),
            "attached": e.attached,
        }));
    }

    fn on_duplicate_layer(&mut self, id: &str) {
        self.events.push(json!({ "event": "duplicate_layer", "id": id }));
    }

    fn on_layer_unregistered(&mut self, id: &str) {
        self.events.push(json!({ "event": "layer_unregistered", "id": id }));
    }

    fn on_layer_state(&mut self, e: &LayerStateEvent<'_>) {
        self.events.push(json!({
            "event": "layer_state",
            "id": e.id,
            "from": format!("{:?}", e.from),
            "to": format!("{:?}", e.to),
            "cause": format!("{:?}", e.cause),
        }));
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.events.push(json!({
            "event": "visibility",
            "zoom": e.zoom,
            "shown": e.shown,
            "hidden": e.hidden,
        }));
    }

    fn on_unknown_chat_link(&mut self, code: &str) {
        self.events.push(json!({ "event": "unknown_chat_link", "code": code }));
    }

    fn on_message(&mut self, e: &MessageEvent<'_>) {
        self.events.push(json!({
            "event": "message",
            "kind": format!("{:?}", e.kind),
            "account": e.key.account_name,
            "character": e.key.character_name,
            "created": e.created,
        }));
    }

    fn on_malformed_message(&mut self, topic: &str, reason: &str) {
        self.events.push(json!({
            "event": "malformed_message",
            "topic": topic,
            "reason": reason,
        }));
    }

    fn on_evicted(&mut self, count: usize) {
        self.events.push(json!({ "event": "evicted", "count": count }));
    }

    fn on_redraw(&mut self, e: &RedrawEvent) {
        self.events.push(json!({
            "event": "redraw",
            "upserted": e.upserted,
            "removed": e.removed,
        }));
    }

    fn on_topic_changed(&mut self, old: Option<&str>, new: Option<&str>) {
        self.events.push(json!({ "event": "topic_changed", "old": old, "new": new }));
    }

    fn on_subscribe_failed(&mut self, topic: &str, reason: &str) {
        self.events.push(json!({
            "event": "subscribe_failed",
            "topic": topic,
            "reason": reason,
        }));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use tyria_core::backend::Viewport;
    use tyria_core::geo::LatLng;
    use tyria_core::layer::{LayerOptions, LayerRegistry, LayerState};
    use tyria_core::trace::Tracer;

    /// Headless viewport that only tracks membership.
    #[derive(Debug, Default)]
    struct Headless {
        shown: Vec<u8>,
    }

    impl Viewport for Headless {
        type Renderable = u8;

        fn add_layer(&mut self, layer: &u8) {
            self.shown.push(*layer);
        }

        fn remove_layer(&mut self, layer: &u8) {
            self.shown.retain(|l| l != layer);
        }

        fn has_layer(&self, layer: &u8) -> bool {
            self.shown.contains(layer)
        }

        fn set_opacity(&mut self, _: &u8, _: f32) {}

        fn zoom(&self) -> i32 {
            3
        }

        fn min_zoom(&self) -> i32 {
            0
        }

        fn max_zoom(&self) -> i32 {
            7
        }

        fn center(&self) -> LatLng {
            LatLng::default()
        }

        fn set_view(&mut self, _: LatLng, _: i32) {}
    }

    #[test]
    fn records_registry_activity() {
        let recorder = Rc::new(RefCell::new(JsonRecorder::new()));
        let mut registry = LayerRegistry::with_viewport(Headless::default());
        registry.set_tracer(Tracer::new(recorder.clone()));

        registry.register_layer("waypoints", LayerOptions::new(1, LayerState::Enabled).with_min_zoom(5));
        registry.register_layer("waypoints", LayerOptions::new(2, LayerState::Enabled));

        let recorder = recorder.borrow();
        let names: Vec<_> = recorder
            .events()
            .iter()
            .map(|e| e["event"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "layer_registered",
                "layer_state",
                "visibility",
                "duplicate_layer"
            ]
        );
        assert_eq!(recorder.events()[1]["to"], "Hidden");
    }

    #[test]
    fn writes_json_lines() {
        let mut recorder = JsonRecorder::new();
        recorder.on_evicted(2);
        recorder.on_topic_changed(Some("a/#"), None);

        let mut out = Vec::new();
        recorder.write_lines(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["count"], 2);
        assert_eq!(parsed[1]["new"], Value::Null);
    }
}
