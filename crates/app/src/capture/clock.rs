use std::{thread, time::Duration};

use chrono::Utc;

pub(crate) trait Clock {
    /// Current wall time in whole unix seconds.
    fn unix_seconds(&self) -> i64;
    fn sleep(&self, duration: Duration);
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
