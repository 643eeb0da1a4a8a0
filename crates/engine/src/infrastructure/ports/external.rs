//! Ports for collaborators outside the simulation core.

use std::sync::Arc;

use realmsim_domain::value_objects::Position;
use realmsim_domain::{EntityId, WorldId};
use realmsim_shared::ServerMessage;

// =============================================================================
// Client Delivery
// =============================================================================

/// Delivers one message to one player's connection.
///
/// Visibility filtering happens in the world; implementations only route.
#[cfg_attr(test, mockall::automock)]
pub trait BroadcastPort: Send + Sync {
    fn send_to_player(&self, player: EntityId, message: ServerMessage);
}

/// Server-wide count of connected players, used for realm scaling.
#[cfg_attr(test, mockall::automock)]
pub trait PlayerCountPort: Send + Sync {
    fn connection_player_count(&self) -> usize;
}

// =============================================================================
// Realm Creation
// =============================================================================

/// Asks the host to build a realm named `name`. Must not block; the new
/// world registers its portal when it is ready.
#[cfg_attr(test, mockall::automock)]
pub trait RealmFactoryPort: Send + Sync {
    fn create_realm_async(&self, name: String);
}

// =============================================================================
// Object Definitions
// =============================================================================

/// What is known about an entity at the moment it died.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathRecord {
    pub world_id: WorldId,
    pub entity_id: EntityId,
    pub object_type: u16,
    pub name: String,
    pub position: Position,
    /// Players credited with the kill, highest damage first
    pub credited: Vec<(EntityId, i32)>,
}

/// Per-object-type death behaviour (loot drops, announcements).
pub trait DeathHandler: Send + Sync {
    fn handle(&self, death: &DeathRecord, broadcast: &dyn BroadcastPort);
}

/// Read-only lookup into loaded object definitions.
#[cfg_attr(test, mockall::automock)]
pub trait DefinitionsPort: Send + Sync {
    fn death_handler(&self, object_type: u16) -> Option<Arc<dyn DeathHandler>>;
}
