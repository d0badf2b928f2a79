//! Timestamp type and the clock seam.
//!
//! Timestamps are Unix epoch seconds (UTC). Phase windows are configured in
//! minutes and converted once, at event creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A clock set before 1970 reads as the epoch.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by whole minutes, `None` on overflow.
    pub fn plus_minutes(&self, minutes: u64) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(|secs| self.0.checked_add(secs))
            .map(Self)
    }

    /// Seconds from `now` until this timestamp (0 if already passed).
    pub fn secs_until(&self, now: Timestamp) -> u64 {
        self.0.saturating_sub(now.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the authoritative wall-clock reading.
///
/// Every protocol transition reads the clock exactly once and evaluates all
/// of its phase checks against that single reading.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The operating-system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_minutes_converts_to_seconds() {
        assert_eq!(Timestamp::new(100).plus_minutes(2), Some(Timestamp::new(220)));
        assert_eq!(Timestamp::new(u64::MAX).plus_minutes(1), None);
        assert_eq!(Timestamp::new(0).plus_minutes(u64::MAX), None);
    }

    #[test]
    fn secs_until_saturates() {
        assert_eq!(Timestamp::new(50).secs_until(Timestamp::new(20)), 30);
        assert_eq!(Timestamp::new(50).secs_until(Timestamp::new(90)), 0);
    }
}
