// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topic filter matching.
//!
//! Topics are `/`-separated levels. A filter level of `+` matches exactly one
//! topic level; a final `#` matches the parent level and everything below it.

use crate::transport::TransportError;

/// Checks that `filter` uses wildcards only as whole levels, with `#` last.
pub fn validate_filter(filter: &str) -> Result<(), TransportError> {
    if filter.is_empty() {
        return Err(TransportError::InvalidFilter(filter.to_owned()));
    }
    let mut levels = filter.split('/').peekable();
    while let Some(level) = levels.next() {
        let is_last = levels.peek().is_none();
        let valid = match level {
            "#" => is_last,
            "+" => true,
            _ => !level.contains(['+', '#']),
        };
        if !valid {
            return Err(TransportError::InvalidFilter(filter.to_owned()));
        }
    }
    Ok(())
}

/// Returns whether `topic` matches `filter`.
///
/// `filter` is assumed valid; see [`validate_filter`].
#[must_use]
pub fn matches(filter: &str, topic: &str) -> bool {
    let mut filter = filter.split('/');
    let mut topic = topic.split('/');
    loop {
        match (filter.next(), topic.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_level_wildcard() {
        let f = "maps.gw2.io/global/1/eu/#";
        assert!(matches(f, "maps.gw2.io/global/1/eu/Foo.1234"));
        assert!(matches(f, "maps.gw2.io/global/1/eu/Foo.1234/Bob"));
        assert!(matches(f, "maps.gw2.io/global/1/eu"), "# also matches the parent");
        assert!(!matches(f, "maps.gw2.io/global/1/us/Foo.1234"));
        assert!(!matches(f, "maps.gw2.io/global/2/eu/Foo.1234"));
    }

    #[test]
    fn single_level_wildcard() {
        let f = "maps.gw2.io/+/1/#";
        assert!(matches(f, "maps.gw2.io/global/1/eu"));
        assert!(!matches(f, "maps.gw2.io/global/2/eu"));
        assert!(matches("a/+", "a/b"));
        assert!(!matches("a/+", "a/b/c"));
        assert!(!matches("a/+", "a"));
    }

    #[test]
    fn exact_match() {
        assert!(matches("a/b", "a/b"));
        assert!(!matches("a/b", "a/b/c"));
        assert!(!matches("a/b/c", "a/b"));
    }

    #[test]
    fn filter_validation() {
        assert!(validate_filter("maps.gw2.io/solo/Foo.1234/#").is_ok());
        assert!(validate_filter("a/+/c").is_ok());
        assert!(validate_filter("a/#/c").is_err());
        assert!(validate_filter("a/b#").is_err());
        assert!(validate_filter("a/b+/c").is_err());
        assert!(validate_filter("").is_err());
    }
}
