//! Testability port for injecting time.

// =============================================================================
// Testability Ports
// =============================================================================

/// Monotonic millisecond clock. Condition durations and slot cooldowns are
/// compared against tick time derived from it, never against wall time.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> u64;
}
