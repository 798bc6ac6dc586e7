//! Time source abstraction for supporting both real-time and simulated time.
//!
//! The timer engine never reads the system clock directly: it is handed an
//! `Arc<dyn TimeSource>` and asks it for `now()` when a session starts and whenever
//! elapsed workout time is recomputed. The countdown scheduler uses the same source
//! to wait between ticks. Swapping in a `SimulatedTimeSource` makes a whole workout
//! run deterministically without waiting for real seconds to pass.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for tests and fast-forwarded runs.
///
/// Time only moves when someone sleeps on it or calls [`advance`](Self::advance).
/// Sleeping jumps the clock forward by exactly the requested duration and yields
/// for a millisecond of real time so other threads get to observe the new time.
pub struct SimulatedTimeSource {
    current: Mutex<DateTime<Local>>,
}

impl SimulatedTimeSource {
    /// Create a simulated clock starting at `start_time`
    pub fn new(start_time: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(start_time),
        }
    }

    /// Move the simulated clock forward without sleeping
    pub fn advance(&self, duration: StdDuration) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard += ChronoDuration::milliseconds(duration.as_millis() as i64);
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, duration: StdDuration) {
        self.advance(duration);
        std::thread::sleep(StdDuration::from_millis(1));
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the global time source, falling back to the real clock
pub fn shared() -> Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running on a simulated clock
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Whole seconds elapsed between `start` and `now`, floored, never negative.
pub fn elapsed_seconds(start: DateTime<Local>, now: DateTime<Local>) -> u64 {
    let millis = (now - start).num_milliseconds();
    if millis <= 0 { 0 } else { (millis / 1000) as u64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_simulated_sleep_advances_clock() {
        let clock = SimulatedTimeSource::new(start());
        clock.sleep(StdDuration::from_secs(90));
        assert_eq!(clock.now(), start() + ChronoDuration::seconds(90));
        assert!(clock.is_simulated());
    }

    #[test]
    fn test_elapsed_seconds_floors_partial_seconds() {
        let t0 = start();
        assert_eq!(elapsed_seconds(t0, t0 + ChronoDuration::milliseconds(1999)), 1);
        assert_eq!(elapsed_seconds(t0, t0 + ChronoDuration::seconds(42)), 42);
    }

    #[test]
    fn test_elapsed_seconds_never_negative() {
        let t0 = start();
        assert_eq!(elapsed_seconds(t0, t0 - ChronoDuration::seconds(5)), 0);
    }
}
