// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tokio runtime for the live position pipeline.
//!
//! `tyria_core` decides what to show; this crate moves the messages:
//!
//! - [`transport`]: the publish/subscribe seam ([`Transport`](transport::Transport))
//!   and [`LocalBroker`](transport::LocalBroker), an in-memory broker with
//!   `+`/`#` topic filters.
//! - [`session`]: [`LiveSession`](session::LiveSession), one task that owns a
//!   map's state, resubscribes when the computed topic changes, applies
//!   messages in arrival order and sweeps stale characters on a timer.
//! - [`headless`]: viewport, history and presenter implementations with no
//!   map widget behind them.
//! - [`config`]: loading [`LiveConfig`](tyria_core::config::LiveConfig) from a
//!   JSON file.
//!
//! Sessions share their tracer through `Rc`, so a session is `!Send`. Run it
//! on a current-thread runtime or inside a `LocalSet`.

pub mod config;
mod error;
pub mod headless;
pub mod session;
pub mod topic;
pub mod transport;

pub use error::Error;
