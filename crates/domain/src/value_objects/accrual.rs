//! Fixed-point accrual for rate-based effects (bleeding, regeneration).
//!
//! Rates are whole units per second and elapsed time is whole milliseconds,
//! so `rate * elapsed_ms` is an exact count of milli-units. Whole units are
//! paid out as soon as they accumulate and the remainder is carried to the
//! next tick. No floating point, no drift over long sessions.

use serde::{Deserialize, Serialize};

const MILLIS_PER_UNIT: u64 = 1000;

/// Accumulated milli-units not yet paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Accrual {
    milli_units: u64,
}

impl Accrual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `rate_per_sec * elapsed_ms` and return the whole units now due.
    pub fn accrue(&mut self, rate_per_sec: u32, elapsed_ms: u32) -> u32 {
        self.milli_units += u64::from(rate_per_sec) * u64::from(elapsed_ms);
        let whole = self.milli_units / MILLIS_PER_UNIT;
        self.milli_units %= MILLIS_PER_UNIT;
        u32::try_from(whole).unwrap_or(u32::MAX)
    }

    /// Fractional remainder carried forward, in milli-units.
    pub fn remainder_milli(&self) -> u64 {
        self.milli_units
    }

    pub fn reset(&mut self) {
        self.milli_units = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pays_whole_units_and_carries_remainder() {
        let mut acc = Accrual::new();
        // 28/s over 25ms = 0.7 units
        assert_eq!(acc.accrue(28, 25), 0);
        assert_eq!(acc.remainder_milli(), 700);
        // +0.7 = 1.4 -> pay 1, carry 0.4
        assert_eq!(acc.accrue(28, 25), 1);
        assert_eq!(acc.remainder_milli(), 400);
    }

    #[test]
    fn large_step_pays_multiple_units() {
        let mut acc = Accrual::new();
        assert_eq!(acc.accrue(28, 1000), 28);
        assert_eq!(acc.remainder_milli(), 0);
    }

    #[test]
    fn reset_drops_remainder() {
        let mut acc = Accrual::new();
        acc.accrue(3, 100);
        acc.reset();
        assert_eq!(acc.remainder_milli(), 0);
    }
}
