// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Write errors
//! are ignored.

use std::io::Write;

use tyria_core::live::MessageKind;
use tyria_core::trace::{
    LayerRegisteredEvent, LayerStateEvent, MessageEvent, RedrawEvent, StateCause, TraceSink,
    VisibilityEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.writer.write_fmt(args);
        let _ = self.writer.write_all(b"\n");
    }
}

fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Movement => "movement",
        MessageKind::State => "state",
        MessageKind::Delete => "delete",
        MessageKind::KeepAlive => "keepalive",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_layer_registered(&mut self, e: &LayerRegisteredEvent<'_>) {
        self.line(format_args!(
            "[layer] register {} {:?}{}",
            e.id,
            e.state,
            if e.attached { " (attached)" } else { "" }
        ));
    }

    fn on_duplicate_layer(&mut self, id: &str) {
        self.line(format_args!("[layer] duplicate {id} ignored"));
    }

    fn on_layer_unregistered(&mut self, id: &str) {
        self.line(format_args!("[layer] unregister {id}"));
    }

    fn on_layer_state(&mut self, e: &LayerStateEvent<'_>) {
        let cause = match e.cause {
            StateCause::Zoom => "zoom",
            StateCause::Explicit => "toggle",
        };
        self.line(format_args!(
            "[layer] {} {:?} -> {:?} ({cause})",
            e.id, e.from, e.to
        ));
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.line(format_args!(
            "[view] zoom={} shown={} hidden={}",
            e.zoom, e.shown, e.hidden
        ));
    }

    fn on_unknown_chat_link(&mut self, code: &str) {
        self.line(format_args!("[view] no marker for chat link {code}"));
    }

    fn on_message(&mut self, e: &MessageEvent<'_>) {
        self.line(format_args!(
            "[live] {} {}{}",
            kind_label(e.kind),
            e.key,
            if e.created { " (new)" } else { "" }
        ));
    }

    fn on_malformed_message(&mut self, topic: &str, reason: &str) {
        self.line(format_args!("[live] malformed message on {topic}: {reason}"));
    }

    fn on_evicted(&mut self, count: usize) {
        self.line(format_args!("[live] evicted {count}"));
    }

    fn on_redraw(&mut self, e: &RedrawEvent) {
        self.line(format_args!(
            "[live] redraw upserted={} removed={}",
            e.upserted, e.removed
        ));
    }

    fn on_topic_changed(&mut self, old: Option<&str>, new: Option<&str>) {
        self.line(format_args!(
            "[live] topic {} -> {}",
            old.unwrap_or("-"),
            new.unwrap_or("-")
        ));
    }

    fn on_subscribe_failed(&mut self, topic: &str, reason: &str) {
        self.line(format_args!("[live] cannot subscribe to {topic}: {reason}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyria_core::layer::LayerState;
    use tyria_core::live::CharacterKey;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        sink.on_layer_state(&LayerStateEvent {
            id: "waypoints",
            from: LayerState::Hidden,
            to: LayerState::Enabled,
            cause: StateCause::Zoom,
        });
        let key = CharacterKey::new("A.1234", "Bob");
        sink.on_message(&MessageEvent {
            kind: MessageKind::Movement,
            key: &key,
            created: true,
        });
        sink.on_topic_changed(None, Some("maps.gw2.io/global/1/eu/#"));

        let out = output(sink);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "[layer] waypoints Hidden -> Enabled (zoom)",
                "[live] movement A.1234/Bob (new)",
                "[live] topic - -> maps.gw2.io/global/1/eu/#",
            ]
        );
    }
}
