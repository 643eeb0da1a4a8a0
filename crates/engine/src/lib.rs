//! RealmSim Engine library.
//!
//! Server side of the realm simulation: worlds and their tick loops, the
//! combat use cases that run inside them and the registry that scales realms
//! with population.
//!
//! ## Structure
//!
//! - `world/` - Entity container, damage credit, death hooks, world commands
//! - `use_cases/` - Procs and admin toggles run against one world
//! - `realms/` - Portal registry and realm name pool
//! - `tick` - Per-realm tick loop
//! - `game_server` - Realm lifecycle host
//! - `infrastructure/` - Ports, adapters and configuration
//! - `api/` - Connection hub the networking layer plugs into

pub mod api;
pub mod game_server;
pub mod infrastructure;
pub mod realms;
pub mod tick;
pub mod use_cases;
pub mod world;

/// Shared helpers for unit tests.
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use game_server::GameServer;
pub use world::{World, WorldError};
