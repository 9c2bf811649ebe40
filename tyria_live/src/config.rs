// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading [`LiveConfig`] from disk.

use std::fs;
use std::path::Path;

use tyria_core::config::LiveConfig;

use crate::Error;

/// Reads and validates a JSON configuration file.
///
/// Fields missing from the file keep their defaults.
pub fn load(path: impl AsRef<Path>) -> Result<LiveConfig, Error> {
    let text = fs::read_to_string(path.as_ref())?;
    let config = LiveConfig::from_json(&text)?;
    validate(&config)?;
    Ok(config)
}

/// Rejects values the runtime cannot work with.
pub fn validate(config: &LiveConfig) -> Result<(), Error> {
    if config.namespace.is_empty() || config.namespace.contains(['+', '#']) {
        return Err(Error::Config(format!(
            "namespace {:?} is not a plain topic prefix",
            config.namespace
        )));
    }
    if config.freshness_window_ms == 0 {
        return Err(Error::Config("freshness_window_ms must be positive".into()));
    }
    if config.queue_capacity == 0 {
        return Err(Error::Config("queue_capacity must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_partial_file() {
        let file = config_file(r#"{ "sweep_interval_ms": 1000 }"#);
        let config = load(file.path()).unwrap();
        assert_eq!(config.sweep_interval_ms, 1000);
        assert_eq!(config.freshness_window_ms, 30_000);
    }

    #[test]
    fn rejects_zero_capacity() {
        let file = config_file(r#"{ "queue_capacity": 0 }"#);
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn malformed_file_is_json_error() {
        let file = config_file("{ \"queue_capacity\": ");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("not-here.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err}");
    }

    #[test]
    fn wildcard_namespace_is_rejected() {
        let config = LiveConfig {
            namespace: "maps/#".into(),
            ..LiveConfig::default()
        };
        assert!(validate(&config).is_err());
    }
}
