// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic millisecond timestamps for message freshness.
//!
//! [`Timestamp`] is the clock the live pipeline stamps inbound messages with.
//! Its origin is chosen by the runtime (usually session start); only
//! differences between timestamps are meaningful. Ages are expressed as
//! [`core::time::Duration`] so configuration can stay in familiar units.

use core::fmt;
use core::ops::Add;
use core::time::Duration;

/// A point on the pipeline's monotonic clock, in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from whole seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> u64 {
        self.0
    }

    /// Returns the time elapsed since `earlier`, or zero if `earlier` is
    /// after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "pipeline lifetimes are far below u64::MAX milliseconds"
    )]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_saturates_at_zero() {
        let t = Timestamp::from_secs(10);
        assert_eq!(
            t.saturating_duration_since(Timestamp::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(
            t.saturating_duration_since(Timestamp::from_secs(40)),
            Duration::ZERO
        );
    }

    #[test]
    fn add_duration() {
        let t = Timestamp::from_secs(1) + Duration::from_millis(250);
        assert_eq!(t.millis(), 1250);
    }
}
