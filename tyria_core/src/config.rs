// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for the live position pipeline.

use alloc::string::String;
use core::time::Duration;

use serde::Deserialize;

/// Tunables shared by the channel router, the marker store and the runtime.
///
/// Every field has a default, so a configuration document only needs to name
/// the values it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Leading topic segment of every subscription.
    pub namespace: String,
    /// Continent whose global channel is split by region instead of by match.
    pub home_continent: u32,
    /// How long an entry stays live without a message, in milliseconds.
    pub freshness_window_ms: u64,
    /// Period of the eviction sweep, in milliseconds.
    pub sweep_interval_ms: u64,
    /// Zoom level at which world coordinates map 1:1 to view pixels.
    pub marker_zoom: i32,
    /// Whether a topic switch empties the character table.
    pub clear_on_topic_change: bool,
    /// Buffered publishes per subscription before the transport drops.
    pub queue_capacity: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            namespace: String::from("maps.gw2.io"),
            home_continent: 1,
            freshness_window_ms: 30_000,
            sweep_interval_ms: 5_000,
            marker_zoom: 7,
            clear_on_topic_change: true,
            queue_capacity: 256,
        }
    }
}

impl LiveConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the freshness window.
    #[must_use]
    pub const fn freshness_window(&self) -> Duration {
        Duration::from_millis(self.freshness_window_ms)
    }

    /// Returns the sweep period, never shorter than one millisecond.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        if self.sweep_interval_ms == 0 {
            Duration::from_millis(1)
        } else {
            Duration::from_millis(self.sweep_interval_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = LiveConfig::from_json(r#"{ "freshness_window_ms": 10000 }"#).unwrap();
        assert_eq!(config.freshness_window(), Duration::from_secs(10));
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
        assert_eq!(config.namespace, "maps.gw2.io");
        assert!(config.clear_on_topic_change);
    }

    #[test]
    fn zero_sweep_interval_is_clamped() {
        let config = LiveConfig {
            sweep_interval_ms: 0,
            ..LiveConfig::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_millis(1));
    }
}
