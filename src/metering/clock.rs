use chrono::{Local, TimeZone};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time for the fare meter.
///
/// The meter never reads the system clock directly; it asks its `Clock`, so
/// tests and the ride simulation can drive elapsed time deterministically.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test (or the ride
/// simulation) can keep a handle and advance time while the meter holds
/// another clone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    pub fn starting_at(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn starting_now() -> Self {
        Self::starting_at(SystemTime::now())
    }

    pub fn advance(&self, delta: Duration) {
        *self.now.lock().unwrap() += delta;
    }

    /// Moves the clock backwards, as an adjusted wall clock would.
    pub fn rewind(&self, delta: Duration) {
        *self.now.lock().unwrap() -= delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

/// Seconds since the Unix epoch, `0.0` for instants before it.
pub fn epoch_seconds(at: SystemTime) -> f64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Formats an epoch-seconds timestamp as local `HH:MM:SS` for display lines.
pub fn clock_time(timestamp: u64) -> String {
    Local
        .timestamp_opt(timestamp as i64, 0)
        .single()
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(UNIX_EPOCH);
        let handle = clock.clone();
        handle.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(90));
    }

    #[test]
    fn manual_clock_rewinds() {
        let clock = ManualClock::starting_at(UNIX_EPOCH + Duration::from_secs(100));
        clock.rewind(Duration::from_secs(40));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(60));
    }

    #[test]
    fn epoch_seconds_is_zero_before_epoch() {
        let before = UNIX_EPOCH - Duration::from_secs(5);
        assert_eq!(epoch_seconds(before), 0.0);
        assert_eq!(epoch_seconds(UNIX_EPOCH + Duration::from_secs(7)), 7.0);
    }

    #[test]
    fn clock_time_is_hh_mm_ss() {
        let rendered = clock_time(1_700_000_000);
        assert_eq!(rendered.len(), 8);
        assert_eq!(rendered.as_bytes()[2], b':');
        assert_eq!(rendered.as_bytes()[5], b':');
    }
}
