//! Randomness seam.
//!
//! The domain never reaches for a global RNG. Anything probabilistic
//! (rarity draws, proc rolls, size jitter) takes a `RandomSource`, so tests
//! can script every draw.

/// Source of random numbers for game-rule branching.
pub trait RandomSource: Send + Sync {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}

/// Deterministic random source for tests: every roll returns the same
/// values.
#[cfg(test)]
pub(crate) struct FixedRandom {
    pub roll: f64,
    pub pick: i32,
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
