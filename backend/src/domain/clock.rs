//! Wall-clock access for everything that depends on the local day.
//!
//! Services never call `Local::now()` directly; they go through a [`Clock`]
//! so day boundaries can be exercised deterministically.

use chrono::{DateTime, Duration, Local, NaiveDate};
use std::sync::{Mutex, PoisonError};

pub trait Clock: Send + Sync {
    /// Current instant in the observer's local timezone
    fn now(&self) -> DateTime<Local>;

    /// Current local day
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
