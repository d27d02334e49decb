/// Time sources for the instrument
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Monotonic time since the clock was created, used for scheduling
    fn now(&self) -> Duration;

    /// Wall-clock milliseconds since the Unix epoch, used to stamp taps
    fn wall_millis(&self) -> u64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and give the other to the instrument.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    wall_origin_ms: u64,
}

impl ManualClock {
    pub fn new(wall_origin_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
            wall_origin_ms,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_millis(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn wall_millis(&self) -> u64 {
        self.wall_origin_ms + self.now.get().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();
        handle.advance_millis(250);
        assert_eq!(clock.now(), Duration::from_millis(250));
        assert_eq!(clock.wall_millis(), 1_250);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(clock.wall_millis() > 0);
    }
}
