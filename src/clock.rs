//! Injectable time source
//!
//! Staleness checks and elapsed-time measurement go through this trait so
//! tests can drive the clock deterministically.

use chrono::{DateTime, Utc};

/// Time source for staleness checks and elapsed-time measurement
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
