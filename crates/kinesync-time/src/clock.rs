//! Clock sources for local receipt time
//!
//! Buffers never read a process-wide clock. Whoever owns a buffer passes a
//! [`Clock`] in, so tests and replays can drive time by hand.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A source of local time in seconds
pub trait Clock: Send + Sync {
    /// Current local time in seconds
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Monotonic wall clock, zero at construction
/// INVARIANT: `now()` never decreases
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    /// Reference to monotonic OS clock
    reference: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.reference.elapsed()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and replay
#[derive(Debug, Default)]
pub struct ManualClock {
    value: Mutex<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        ManualClock {
            value: Mutex::new(start),
        }
    }

    pub fn set(&self, seconds: f64) {
        *self.value.lock() = seconds;
    }

    /// Move the clock forward and return the new time
    pub fn advance(&self, dt: f64) -> f64 {
        let mut value = self.value.lock();
        *value += dt;
        *value
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.value.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();

        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= 0.009);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1.0);
        assert_eq!(clock.now(), 1.0);

        assert_eq!(clock.advance(0.5), 1.5);
        clock.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_shared_clock_through_arc() {
        let clock = Arc::new(ManualClock::new(0.0));
        let shared: Arc<dyn Clock> = clock.clone();

        clock.advance(2.0);
        assert_eq!(shared.now(), 2.0);
    }
}
