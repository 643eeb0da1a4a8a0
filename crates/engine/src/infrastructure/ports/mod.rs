//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Client delivery (connection layer owns the sockets)
//! - Realm creation (the server host spawns worlds)
//! - Object definitions (death handlers, loaded elsewhere)
//! - Clock (for testing)
//!
//! Randomness is the domain's `RandomSource`.

mod external;
mod testing;

// =============================================================================
// External Collaborator Ports
// =============================================================================
pub use external::{
    BroadcastPort, DeathHandler, DeathRecord, DefinitionsPort, PlayerCountPort, RealmFactoryPort,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockBroadcastPort, MockDefinitionsPort, MockPlayerCountPort, MockRealmFactoryPort,
};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;
