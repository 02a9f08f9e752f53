//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform value in `min..=max`.
    fn gen_range(&self, min: u32, max: u32) -> u32;
}
