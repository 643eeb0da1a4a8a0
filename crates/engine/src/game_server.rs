//! Server host: owns the realm registry, the connection hub and every live
//! realm loop.
//!
//! Realm creation is requested by the registry through `RealmFactoryPort`
//! and served here on the server task, so the registry lock is never held
//! while a world is built.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use realmsim_domain::{RandomSource, WorldId};

use crate::api::ConnectionManager;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ports::{ClockPort, DefinitionsPort, RealmFactoryPort};
use crate::realms::{NamePool, RealmRegistry};
use crate::tick::{LoopSettings, WorldLoop};
use crate::world::{RealmStatus, World, WorldCommand, WorldSettings};

// =============================================================================
// Realm Factory
// =============================================================================

/// Forwards realm-creation requests to the server task.
pub struct ChannelRealmFactory {
    requests: mpsc::UnboundedSender<String>,
}

impl ChannelRealmFactory {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }
}

impl RealmFactoryPort for ChannelRealmFactory {
    fn create_realm_async(&self, name: String) {
        if let Err(e) = self.requests.send(name) {
            tracing::warn!(realm = %e.0, "Realm request dropped, server is shutting down");
        }
    }
}

// =============================================================================
// Realm Handles
// =============================================================================

/// Handle to a running realm: its published status and command queue.
#[derive(Clone)]
pub struct RealmHandle {
    status: Arc<RealmStatus>,
    commands: mpsc::UnboundedSender<WorldCommand>,
}

impl RealmHandle {
    pub fn world_id(&self) -> WorldId {
        self.status.world_id()
    }

    pub fn status(&self) -> &Arc<RealmStatus> {
        &self.status
    }

    /// Queue a command for the realm's next tick. False once the realm loop
    /// has ended.
    pub fn send(&self, command: WorldCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}

// =============================================================================
// Game Server
// =============================================================================

pub struct GameServer {
    config: AppConfig,
    connections: Arc<ConnectionManager>,
    registry: Arc<RealmRegistry>,
    definitions: Arc<dyn DefinitionsPort>,
    clock: Arc<dyn ClockPort>,
    rng: Arc<dyn RandomSource>,
    realms: Arc<DashMap<WorldId, RealmHandle>>,
    requests: mpsc::UnboundedReceiver<String>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl GameServer {
    pub fn new(
        config: AppConfig,
        definitions: Arc<dyn DefinitionsPort>,
        clock: Arc<dyn ClockPort>,
        rng: Arc<dyn RandomSource>,
        cancel: CancellationToken,
    ) -> Self {
        let connections = Arc::new(ConnectionManager::new());
        let (factory, requests) = ChannelRealmFactory::new();
        let registry = Arc::new(RealmRegistry::new(
            NamePool::with_defaults(),
            config.portal_spots.clone(),
            config.max_realms,
            connections.clone(),
            Arc::new(factory),
            rng.clone(),
        ));

        Self {
            config,
            connections,
            registry,
            definitions,
            clock,
            rng,
            realms: Arc::new(DashMap::new()),
            requests,
            tracker: TaskTracker::new(),
            cancel,
        }
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    pub fn registry(&self) -> &Arc<RealmRegistry> {
        &self.registry
    }

    pub fn realm(&self, world_id: WorldId) -> Option<RealmHandle> {
        self.realms.get(&world_id).map(|r| r.value().clone())
    }

    pub fn realm_count(&self) -> usize {
        self.realms.len()
    }

    fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            tick_interval: Duration::from_millis(self.config.tick_interval_ms),
            max_tick_delta_ms: self.config.max_tick_delta_ms,
            lifetime: (self.config.realm_lifetime_secs > 0)
                .then(|| Duration::from_secs(self.config.realm_lifetime_secs)),
        }
    }

    /// Build a realm, register its portal and start its loop.
    ///
    /// When the loop ends the portal is removed, which returns the name to
    /// the pool.
    pub fn spawn_realm(&self, name: String) -> RealmHandle {
        let world_id = WorldId::new();
        let world = World::new(
            world_id,
            WorldSettings {
                display_name: name.clone(),
                max_players: self.config.realm_max_players,
                sight_radius: self.config.sight_radius,
            },
            self.connections.clone(),
            self.definitions.clone(),
            self.rng.clone(),
        );
        let status = world.status();
        let (commands, rx) = mpsc::unbounded_channel();
        let realm_loop = WorldLoop::new(world, rx, self.clock.clone(), self.loop_settings());

        let handle = RealmHandle {
            status: status.clone(),
            commands,
        };
        self.realms.insert(world_id, handle.clone());
        self.registry.add_portal(status);

        let registry = self.registry.clone();
        let realms = self.realms.clone();
        let cancel = self.cancel.child_token();
        self.tracker.spawn(async move {
            realm_loop.run(cancel).await;
            registry.remove_portal(world_id);
            realms.remove(&world_id);
            tracing::info!(world_id = %world_id, realm = %name, "Realm shut down");
        });

        handle
    }

    /// Serve realm requests and run registry maintenance until cancelled,
    /// then wait for every realm loop to finish.
    pub async fn run(mut self) {
        let mut update = tokio::time::interval(Duration::from_millis(self.config.registry_update_ms));
        update.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(max_realms = self.config.max_realms, "Game server running");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("Game server shutting down");
                    break;
                }
                request = self.requests.recv() => match request {
                    Some(name) => {
                        self.spawn_realm(name);
                    }
                    None => break,
                },
                _ = update.tick() => self.registry.update(),
            }
        }

        self.tracker.close();
        self.tracker.wait().await;
        tracing::info!("All realms stopped");
    }
}
