//! Connection management for player clients.
//!
//! Tracks connected clients, the realm each one is in, and the player entity
//! it controls. Messages are queued on a bounded channel per connection; the
//! socket writer lives outside this crate.

use dashmap::DashMap;
use tokio::sync::mpsc;

use realmsim_domain::{ConnectionId, EntityId, WorldId};
use realmsim_shared::ServerMessage;

use crate::infrastructure::ports::{BroadcastPort, PlayerCountPort};

/// Information about a connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Unique ID for this connection
    pub connection_id: ConnectionId,
    /// Account name shown to other players
    pub account_name: String,
    /// The realm this connection is in (if any)
    pub world_id: Option<WorldId>,
    /// The player entity this connection controls (if spawned)
    pub player_id: Option<EntityId>,
}

impl ConnectionInfo {
    /// Whether the client controls a live player entity.
    pub fn is_playing(&self) -> bool {
        self.player_id.is_some()
    }
}

/// Manages all active client connections.
pub struct ConnectionManager {
    /// Map of connection_id -> (ConnectionInfo, sender channel)
    connections: DashMap<ConnectionId, (ConnectionInfo, mpsc::Sender<ServerMessage>)>,
    /// Reverse index: player entity -> connection
    players: DashMap<EntityId, ConnectionId>,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            players: DashMap::new(),
        }
    }

    /// Register a new connection.
    pub fn register(
        &self,
        connection_id: ConnectionId,
        account_name: impl Into<String>,
        sender: mpsc::Sender<ServerMessage>,
    ) {
        let info = ConnectionInfo {
            connection_id,
            account_name: account_name.into(),
            world_id: None,
            player_id: None,
        };
        self.connections.insert(connection_id, (info, sender));
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Unregister a connection.
    pub fn unregister(&self, connection_id: ConnectionId) {
        if let Some((_, (info, _))) = self.connections.remove(&connection_id) {
            if let Some(player_id) = info.player_id {
                self.players.remove(&player_id);
            }
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    /// Get connection info by ID.
    pub fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        self.connections
            .get(&connection_id)
            .map(|entry| entry.value().0.clone())
    }

    /// Enter a realm as `player_id`.
    pub fn join_world(
        &self,
        connection_id: ConnectionId,
        world_id: WorldId,
        player_id: EntityId,
    ) -> Result<(), ConnectionError> {
        let mut entry = self
            .connections
            .get_mut(&connection_id)
            .ok_or(ConnectionError::NotFound)?;

        if let Some(claimed_by) = self.players.get(&player_id) {
            if *claimed_by != connection_id {
                return Err(ConnectionError::PlayerAlreadyConnected);
            }
        }

        let (info, _) = entry.value_mut();
        if let Some(previous) = info.player_id.replace(player_id) {
            self.players.remove(&previous);
        }
        info.world_id = Some(world_id);
        self.players.insert(player_id, connection_id);

        tracing::info!(
            connection_id = %connection_id,
            world_id = %world_id,
            player_id = %player_id,
            "Connection joined world"
        );
        Ok(())
    }

    /// Leave the current realm.
    pub fn leave_world(&self, connection_id: ConnectionId) {
        if let Some(mut entry) = self.connections.get_mut(&connection_id) {
            let (info, _) = entry.value_mut();
            let old_world = info.world_id.take();
            if let Some(player_id) = info.player_id.take() {
                self.players.remove(&player_id);
            }
            if let Some(world_id) = old_world {
                tracing::info!(
                    connection_id = %connection_id,
                    world_id = %world_id,
                    "Connection left world"
                );
            }
        }
    }

    /// Get all connections in a realm.
    pub fn world_connections(&self, world_id: WorldId) -> Vec<ConnectionInfo> {
        self.connections
            .iter()
            .filter(|entry| entry.value().0.world_id == Some(world_id))
            .map(|entry| entry.value().0.clone())
            .collect()
    }

    /// Number of registered connections, playing or not.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastPort for ConnectionManager {
    fn send_to_player(&self, player: EntityId, message: ServerMessage) {
        let Some(connection_id) = self.players.get(&player).map(|c| *c) else {
            return;
        };
        if let Some(entry) = self.connections.get(&connection_id) {
            let (info, sender) = entry.value();
            if let Err(e) = sender.try_send(message) {
                tracing::warn!(
                    connection_id = %info.connection_id,
                    player_id = %player,
                    error = %e,
                    "Failed to send to player"
                );
            }
        }
    }
}

impl PlayerCountPort for ConnectionManager {
    fn connection_player_count(&self) -> usize {
        self.players.len()
    }
}

/// Errors that can occur during connection operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("Connection not found")]
    NotFound,
    #[error("Player is already controlled by another connection")]
    PlayerAlreadyConnected,
}
