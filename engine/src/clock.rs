//! Wall-clock abstraction.
//!
//! The run loop observes real time in two places: the timestamps written
//! to copied files and the one-second pause between PSP file copies. Both
//! go through the Clock trait so tests can run against a synthetic clock
//! without sleeping.

use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Source of the current time and of the inter-copy pause.
pub trait Clock {
    /// The current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Pause for `duration` before the next operation.
    fn sleep(&self, duration: Duration);
}

/// Production clock backed by the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock for tests: `sleep` advances the reported time
/// instead of blocking.
pub struct ManualClock {
    current: Mutex<SystemTime>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        ManualClock {
            current: Mutex::new(start),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.current.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap();
        *current += duration;
    }
}
