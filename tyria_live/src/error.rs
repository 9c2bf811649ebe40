// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by the live runtime.
///
/// Problems with individual messages never show up here; they are dropped and
/// reported through the session's tracer.
#[derive(Error, Debug)]
pub enum Error {
    /// The transport refused a subscription.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    Config(String),
    /// Reading a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A JSON document did not parse.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
