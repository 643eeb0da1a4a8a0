//! In-memory object definitions.
//!
//! Definition files are loaded elsewhere; this adapter only holds the
//! resulting death handlers keyed by object type.

use std::collections::HashMap;
use std::sync::Arc;

use realmsim_shared::{Argb, ServerMessage};

use crate::infrastructure::ports::{BroadcastPort, DeathHandler, DeathRecord, DefinitionsPort};

/// Death handlers keyed by object type. Read-only once built.
#[derive(Default)]
pub struct StaticDefinitions {
    death_handlers: HashMap<u16, Arc<dyn DeathHandler>>,
}

impl StaticDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_death_handler(mut self, object_type: u16, handler: Arc<dyn DeathHandler>) -> Self {
        self.death_handlers.insert(object_type, handler);
        self
    }

    pub fn len(&self) -> usize {
        self.death_handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.death_handlers.is_empty()
    }
}

impl DefinitionsPort for StaticDefinitions {
    fn death_handler(&self, object_type: u16) -> Option<Arc<dyn DeathHandler>> {
        self.death_handlers.get(&object_type).cloned()
    }
}

/// Loot table: every credited player is told what dropped.
pub struct LootDrop {
    items: Vec<String>,
}

impl LootDrop {
    pub fn new(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl DeathHandler for LootDrop {
    fn handle(&self, death: &DeathRecord, broadcast: &dyn BroadcastPort) {
        if self.items.is_empty() {
            return;
        }
        let drops = self.items.join(", ");
        for (player, _) in &death.credited {
            broadcast.send_to_player(
                *player,
                ServerMessage::Notification {
                    object_id: death.entity_id.to_uuid(),
                    player_id: Some(player.to_uuid()),
                    message: format!("Loot: {}", drops),
                    color: Argb::from_rgb(0xEAC117),
                },
            );
        }
        tracing::debug!(
            entity_id = %death.entity_id,
            object_type = death.object_type,
            recipients = death.credited.len(),
            "Loot dropped"
        );
    }
}
