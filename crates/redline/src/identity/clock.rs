//! Time sources for suggestion timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock that never returns the same instant twice.
///
/// Readings are at microsecond resolution. If the system clock stalls or
/// steps backwards, the reading is bumped one microsecond past the previous
/// one so that `created_at`/`applied_at` ordering stays strict.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_micros: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let mut last = self.last_micros.load(Ordering::Relaxed);
        loop {
            let next = wall.max(last + 1);
            match self.last_micros.compare_exchange_weak(
                last,
                next,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return from_micros(next),
                Err(current) => last = current,
            }
        }
    }
}

/// Clock for tests: starts at a fixed instant and advances by a fixed step
/// after every reading.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    /// Start at `start`, advancing one second per reading.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    /// Start at `start`, advancing by `step` per reading.
    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }

    /// Move the clock forward without taking a reading.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }

    /// The instant the next reading will return.
    pub fn peek(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        // 2024-01-01T12:00:00Z
        Self::starting_at(DateTime::from_timestamp(1_704_110_400, 0).unwrap_or_default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let reading = *current;
        *current += self.step;
        reading
    }
}

fn from_micros(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}
