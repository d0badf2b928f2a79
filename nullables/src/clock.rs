//! Nullable clock: time only moves when told to.

use historia_types::{Clock, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn advance_minutes(&self, minutes: u64) {
        self.advance(minutes * 60);
    }

    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_on_demand() {
        let clock = NullClock::new(1_000);
        assert_eq!(clock.now(), Timestamp::new(1_000));
        clock.advance(5);
        clock.advance_minutes(2);
        assert_eq!(clock.now(), Timestamp::new(1_125));
        clock.set(7);
        assert_eq!(clock.now(), Timestamp::new(7));
    }
}
