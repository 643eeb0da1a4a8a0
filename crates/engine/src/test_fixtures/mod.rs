//! Shared test helpers: a recording broadcast port and entity builders.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{enemy_at, player_at, test_world};
//!
//! #[test]
//! fn test_hits_are_visible() {
//!     let (mut world, recorder) = test_world();
//!     let player = world.add_entity(player_at(0.0, 0.0));
//!     // ... test logic
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use realmsim_domain::value_objects::Position;
use realmsim_domain::{Entity, EntityId, EntityKind, WorldId};
use realmsim_shared::ServerMessage;

use crate::infrastructure::clock::FixedRandom;
use crate::infrastructure::definitions::StaticDefinitions;
use crate::infrastructure::ports::BroadcastPort;
use crate::world::{World, WorldSettings};

/// Object type used for every test enemy.
pub const ENEMY_TYPE: u16 = 0x0d01;
/// Object type used for every test player.
pub const PLAYER_TYPE: u16 = 0x0300;

// =============================================================================
// Broadcast Recorder
// =============================================================================

/// Broadcast port that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingBroadcast {
    sent: Mutex<Vec<(EntityId, ServerMessage)>>,
}

impl RecordingBroadcast {
    pub fn messages_for(&self, player: EntityId) -> Vec<ServerMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(to, _)| *to == player)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn all(&self) -> Vec<(EntityId, ServerMessage)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl BroadcastPort for RecordingBroadcast {
    fn send_to_player(&self, player: EntityId, message: ServerMessage) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((player, message));
    }
}

// =============================================================================
// Worlds And Entities
// =============================================================================

pub fn test_settings() -> WorldSettings {
    WorldSettings {
        display_name: "Medusa".to_string(),
        max_players: 85,
        sight_radius: 15.0,
    }
}

/// Empty world that never rolls a proc or an upgrade.
pub fn test_world() -> (World, Arc<RecordingBroadcast>) {
    test_world_with(FixedRandom::never())
}

pub fn test_world_with(rng: FixedRandom) -> (World, Arc<RecordingBroadcast>) {
    let recorder = Arc::new(RecordingBroadcast::default());
    let world = World::new(
        WorldId::new(),
        test_settings(),
        recorder.clone(),
        Arc::new(StaticDefinitions::new()),
        Arc::new(rng),
    );
    (world, recorder)
}

pub fn player_at(x: f32, y: f32) -> Entity {
    Entity::new(EntityKind::Player, PLAYER_TYPE, Position::new(x, y))
        .with_name("Tester")
        .with_hp(500)
}

pub fn enemy_at(x: f32, y: f32, max_hp: i32) -> Entity {
    Entity::new(EntityKind::Enemy, ENEMY_TYPE, Position::new(x, y))
        .with_name("Goblin")
        .with_hp(max_hp)
}
