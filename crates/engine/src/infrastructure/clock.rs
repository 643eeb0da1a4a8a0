//! Clock and random implementations.

use std::time::Instant;

use realmsim_domain::RandomSource;

use crate::infrastructure::ports::ClockPort;

/// System clock - monotonic milliseconds since the clock was created.
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
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

impl RandomSource for SystemRandom {
    fn next_f64(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }

    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..max)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub u64);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Fixed random for testing: every roll returns `roll`, every range pick
/// returns `pick` clamped into the range.
#[cfg(test)]
pub struct FixedRandom {
    pub roll: f64,
    pub pick: i32,
}

#[cfg(test)]
impl FixedRandom {
    /// Every proc and upgrade roll succeeds.
    pub fn always() -> Self {
        Self { roll: 0.0, pick: 0 }
    }

    /// Every proc and upgrade roll fails.
    pub fn never() -> Self {
        Self { roll: 0.99, pick: 0 }
    }
}

#[cfg(test)]
impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        self.roll
    }

    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.pick.clamp(min, max - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let rng = SystemRandom::new();
        for _ in 0..200 {
            let roll = rng.next_f64();
            assert!((0.0..1.0).contains(&roll));
            let pick = rng.gen_range(3, 7);
            assert!((3..7).contains(&pick));
        }
        assert_eq!(rng.gen_range(5, 5), 5);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
    }
}
