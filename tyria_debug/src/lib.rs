// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, `tracing` forwarding and JSON recording for tyria
//! diagnostics.
//!
//! This crate provides [`TraceSink`](tyria_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`log::TracingSink`]: forwards events to the `tracing` ecosystem.
//! - [`recorder::JsonRecorder`]: records events as JSON values and writes
//!   them as JSON lines.

pub mod log;
pub mod pretty;
pub mod recorder;
