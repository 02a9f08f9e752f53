//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        use rand::Rng;
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing. Rolls the fixed value clamped to the requested range.
#[cfg(test)]
pub struct FixedRandom(pub u32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_bounds() {
        let random = SystemRandom::new();
        for _ in 0..200 {
            let value = random.gen_range(2, 5);
            assert!((2..=5).contains(&value));
        }
        assert_eq!(random.gen_range(7, 7), 7);
    }

    #[test]
    fn fixed_random_handles_inverted_bounds_like_system_random() {
        assert_eq!(FixedRandom(9).gen_range(5, 2), 5);
        assert_eq!(SystemRandom::new().gen_range(5, 2), 5);
        assert_eq!(FixedRandom(9).gen_range(0, 3), 3);
    }
}
