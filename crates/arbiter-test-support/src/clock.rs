//! Test clocks — deterministic `Clock` implementations for tests.

use std::sync::Mutex;

use arbiter_core::clock::Clock;
use chrono::{DateTime, Duration, Utc};

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that advances by a fixed step every time it is read. Useful when a
/// test needs distinct, ordered timestamps across several ledger operations.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    /// Create a clock whose first reading is `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let current = *next;
        *next = current + self.step;
        current
    }
}
