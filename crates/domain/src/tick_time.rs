//! Tick timing for the simulation loop.
//!
//! Every world advances in discrete ticks. A `TickTime` carries the
//! monotonic clock reading for the tick (`total_ms`) and the elapsed time
//! since the previous tick (`elapsed_ms`). Durations and cooldowns are
//! compared against `total_ms`; rate-based effects scale by `elapsed_ms`.

use serde::{Deserialize, Serialize};

/// One simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickTime {
    /// Number of ticks completed before this one
    pub tick_count: u64,
    /// Milliseconds elapsed since the previous tick
    pub elapsed_ms: u32,
    /// Monotonic clock reading in milliseconds
    pub total_ms: u64,
}

impl TickTime {
    pub fn new(tick_count: u64, elapsed_ms: u32, total_ms: u64) -> Self {
        Self {
            tick_count,
            elapsed_ms,
            total_ms,
        }
    }

    /// Time at which the world starts ticking.
    pub fn start() -> Self {
        Self::default()
    }

    /// Build the following tick, clamping the delta to `max_delta_ms`.
    ///
    /// A long stall (debugger, overloaded host) must not turn into one huge
    /// step that kills everything bleeding.
    pub fn advance(self, elapsed_ms: u32, max_delta_ms: u32) -> Self {
        let elapsed_ms = elapsed_ms.min(max_delta_ms);
        Self {
            tick_count: self.tick_count + 1,
            elapsed_ms,
            total_ms: self.total_ms + u64::from(elapsed_ms),
        }
    }

    /// Elapsed time in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.elapsed_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_total_and_count() {
        let t = TickTime::start().advance(200, 1000).advance(150, 1000);
        assert_eq!(t.tick_count, 2);
        assert_eq!(t.elapsed_ms, 150);
        assert_eq!(t.total_ms, 350);
    }

    #[test]
    fn advance_clamps_delta() {
        let t = TickTime::start().advance(5_000, 1000);
        assert_eq!(t.elapsed_ms, 1000);
        assert_eq!(t.total_ms, 1000);
    }

    #[test]
    fn delta_secs_converts_millis() {
        let t = TickTime::new(1, 250, 250);
        assert!((t.delta_secs() - 0.25).abs() < f32::EPSILON);
    }
}
