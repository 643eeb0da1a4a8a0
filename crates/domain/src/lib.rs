//! RealmSim domain - the pure simulation model.
//!
//! Entities, their stats and condition effects, combat math and the
//! lifecycle state machine. Nothing here performs I/O, logs or reads a
//! clock; every mutation reports what happened through an outcome enum.

pub mod combat;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod random;
pub mod tick_time;
pub mod value_objects;

pub use entities::{Entity, EntityKind, NotableFlags};
pub use error::DomainError;
pub use events::{
    ClassificationOutcome, DamageOutcome, DeathTransition, HealOutcome, TickOutcome,
};
pub use ids::{ConnectionId, EntityId, WorldId};
pub use random::RandomSource;
pub use tick_time::TickTime;
