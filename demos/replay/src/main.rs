// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replays a captured live-position stream through a headless session.
//!
//! A capture is a JSON-lines file. Every line carries `at_ms`, the offset from
//! the start of the replay, and one of:
//!
//! - `"account": {...}`: sign in (`SetUserData`)
//! - `"continent": 2`: switch continent
//! - `"channel": "Solo"`: select a channel
//! - `"view": "-120,140,5"`: move the viewport
//! - `"topic": "...", "payload": {...}`: a message published on the broker
//!
//! The replay runs in real time. Diagnostics go to `tracing` (filtered by
//! `RUST_LOG`), to a pretty printer with `--pretty`, or to a JSON-lines file
//! with `--record <path>`. The final live markers are printed to stdout.
//!
//! Run with: `cargo run -p replay -- demos/replay/captures/two_players.jsonl`
//!
//! Pass `demos/replay/captures/fast_expiry.json` as the config to watch
//! characters expire within a couple of seconds.

use std::cell::RefCell;
use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing_subscriber::EnvFilter;

use tyria_core::channel::ChannelMode;
use tyria_core::config::LiveConfig;
use tyria_core::geo::LatLng;
use tyria_core::layer::{LayerOptions, LayerRegistry, LayerState};
use tyria_core::state::{AccountInfo, Transition};
use tyria_core::trace::{SharedSink, Tracer};
use tyria_core::view::{ViewFragment, ViewportController};
use tyria_debug::log::TracingSink;
use tyria_debug::pretty::PrettyPrintSink;
use tyria_debug::recorder::JsonRecorder;
use tyria_live::headless::{HeadlessViewport, MarkerTable, MemoryHistory};
use tyria_live::session::{LiveSession, SessionEvent};
use tyria_live::transport::LocalBroker;

/// How long to keep the session alive after the last step so queued
/// messages drain.
const DRAIN: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON-lines capture to replay.
    capture: PathBuf,
    /// Live configuration file; defaults apply when omitted.
    config: Option<PathBuf>,
    /// Print trace events to stderr, one line each.
    #[arg(long)]
    pretty: bool,
    /// Record trace events as JSON lines to this file.
    #[arg(long, value_name = "PATH", conflicts_with = "pretty")]
    record: Option<PathBuf>,
}

enum Action {
    Event(SessionEvent),
    Publish { topic: String, payload: Vec<u8> },
}

struct Step {
    at: Duration,
    action: Action,
}

fn parse_step(line: &str) -> Result<Step, Box<dyn Error>> {
    let value: Value = serde_json::from_str(line)?;
    let at = Duration::from_millis(value.get("at_ms").and_then(Value::as_u64).unwrap_or(0));

    let action = if let Some(topic) = value.get("topic").and_then(Value::as_str) {
        let payload = value.get("payload").map(Value::to_string).unwrap_or_default();
        Action::Publish {
            topic: topic.to_owned(),
            payload: payload.into_bytes(),
        }
    } else if let Some(account) = value.get("account") {
        let account: AccountInfo = serde_json::from_value(account.clone())?;
        Action::Event(SessionEvent::Transition(Transition::SetUserData(account)))
    } else if let Some(continent) = value.get("continent").and_then(Value::as_u64) {
        let continent = u32::try_from(continent)?;
        Action::Event(SessionEvent::Transition(Transition::SetActiveContinent(
            continent,
        )))
    } else if let Some(channel) = value.get("channel") {
        let mode: ChannelMode = serde_json::from_value(channel.clone())?;
        Action::Event(SessionEvent::Transition(Transition::SelectChannel(mode)))
    } else if let Some(view) = value.get("view").and_then(Value::as_str) {
        Action::Event(SessionEvent::SetView(ViewFragment::parse(view)?))
    } else {
        return Err(format!("unrecognized capture line: {line}").into());
    };
    Ok(Step { at, action })
}

fn load_capture(path: &Path) -> Result<Vec<Step>, Box<dyn Error>> {
    fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(parse_step)
        .collect()
}

async fn replay(
    steps: Vec<Step>,
    config: LiveConfig,
    tracer: Tracer,
) -> MarkerTable {
    let broker = LocalBroker::new(config.queue_capacity);

    let mut registry = LayerRegistry::with_viewport(HeadlessViewport::new(2, 0, 7));
    registry.register_layer(
        "waypoints",
        LayerOptions::new("waypoints".to_owned(), LayerState::Enabled).with_min_zoom(5),
    );
    registry.register_layer(
        "regions",
        LayerOptions::new("regions".to_owned(), LayerState::Enabled)
            .with_max_zoom(4)
            .with_opacity(2, 1.0)
            .with_opacity(3, 0.6)
            .with_opacity(4, 0.3),
    );
    let controller = ViewportController::new(
        MemoryHistory::default(),
        ViewFragment::new(LatLng::new(-160.0, 160.0), 2),
    );

    let mut session = LiveSession::new(
        config,
        registry,
        controller,
        MarkerTable::default(),
        broker.clone(),
        "live".to_owned(),
    )
    .with_tracer(tracer);

    let (tx, rx) = mpsc::channel(16);
    let token = session.cancellation_token();
    let feeder = async move {
        let start = Instant::now();
        for step in steps {
            time::sleep_until(start + step.at).await;
            match step.action {
                Action::Event(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Action::Publish { topic, payload } => {
                    let delivered = broker.publish(&topic, payload);
                    tracing::debug!(topic = %topic, delivered, "published");
                }
            }
        }
        time::sleep(DRAIN).await;
        token.cancel();
    };

    tokio::join!(session.run(rx), feeder);

    let fragment = session.controller().history().fragment().unwrap_or("-");
    tracing::info!(fragment, shown = ?session.registry().viewport().map(|v| v.shown().collect::<Vec<_>>()), "final view");
    session.presenter().clone()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => tyria_live::config::load(path)?,
        None => LiveConfig::default(),
    };
    let steps = load_capture(&cli.capture)?;

    // -- sinks -------------------------------------------------------------
    let recorder = Rc::new(RefCell::new(JsonRecorder::new()));
    let sink: SharedSink = if cli.record.is_some() {
        recorder.clone()
    } else if cli.pretty {
        Rc::new(RefCell::new(PrettyPrintSink::stderr()))
    } else {
        Rc::new(RefCell::new(TracingSink))
    };

    // -- run ---------------------------------------------------------------
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let markers = runtime.block_on(replay(steps, config, Tracer::new(sink)));

    for marker in markers.iter() {
        println!(
            "{:<28} lat={:>9.2} lng={:>9.2} rot={:>7.1} {:?}",
            marker.key.to_string(),
            marker.lat_lng.lat,
            marker.lat_lng.lng,
            marker.rotation,
            marker.icon
        );
    }
    println!("{} live marker(s)", markers.len());

    if let Some(path) = cli.record {
        let mut out = BufWriter::new(File::create(&path)?);
        recorder.borrow().write_lines(&mut out)?;
        eprintln!(
            "wrote {} trace event(s) to {}",
            recorder.borrow().events().len(),
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn parses_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "replay",
            "two_players.jsonl",
            "fast_expiry.json",
            "--record",
            "out.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.capture, Path::new("two_players.jsonl"));
        assert_eq!(cli.config.as_deref(), Some(Path::new("fast_expiry.json")));
        assert_eq!(cli.record.as_deref(), Some(Path::new("out.jsonl")));
        assert!(!cli.pretty);
    }

    #[test]
    fn record_needs_a_path() {
        let err = Cli::try_parse_from(["replay", "two_players.jsonl", "--record"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn capture_is_required() {
        let err = Cli::try_parse_from(["replay", "--pretty"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_capture_lines() {
        let step = parse_step(r#"{"at_ms": 250, "channel": "Solo"}"#).unwrap();
        assert_eq!(step.at, Duration::from_millis(250));
        assert!(matches!(
            step.action,
            Action::Event(SessionEvent::Transition(Transition::SelectChannel(
                ChannelMode::Solo
            )))
        ));
        assert!(parse_step(r#"{"at_ms": 0}"#).is_err());
    }
}
