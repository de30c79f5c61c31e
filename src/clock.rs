// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Source of "now" for every time-dependent operation.

use chrono::{DateTime, FixedOffset, Local};

pub trait Clock {
    /// Current wall-clock time, carrying the offset used for day boundaries.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at a given instant; advance it by hand.
#[derive(Clone, Debug)]
pub struct FixedClock(std::cell::Cell<DateTime<FixedOffset>>);

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        FixedClock(std::cell::Cell::new(at))
    }

    pub fn set(&self, at: DateTime<FixedOffset>) {
        self.0.set(at);
    }

    pub fn advance(&self, by: chrono::TimeDelta) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}
