//! Injectable clock
//!
//! Attendance and payroll operations are time-dependent; services take a
//! [`Clock`] handle instead of calling `Local::now()` directly so tests can
//! pin "now" to a fixed instant.

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;

/// "当前时间"提供者
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the server's local timezone.
///
/// Attendance timestamps are stored timezone-naive, matching how the
/// storage layer persists them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Test clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
