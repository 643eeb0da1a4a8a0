//! Realm registry - the hub's portal monitor.
//!
//! Tracks one portal per live realm, keeps portal names in step with realm
//! population and asks for new realms when the server fills up. All mutable
//! state sits behind a single mutex; every operation takes it exactly once
//! and never blocks while holding it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use realmsim_domain::value_objects::Position;
use realmsim_domain::{EntityId, RandomSource, WorldId};

use super::names::NamePool;
use crate::infrastructure::ports::{PlayerCountPort, RealmFactoryPort};
use crate::world::RealmStatus;

/// Players per realm before another one is warranted.
pub const MAX_PER_REALM: usize = 85;
/// Extra headroom on top of `MAX_PER_REALM` before scaling out.
const SCALE_MARGIN: usize = 15;
/// Render size of a realm portal.
const PORTAL_SIZE: i32 = 80;

/// Snapshot of a realm portal.
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    pub portal_id: EntityId,
    pub world_id: WorldId,
    /// Realm name without the population suffix
    pub realm_name: String,
    /// `"<realm> (<count>/<max>)"`
    pub name: String,
    pub position: Position,
    pub size: i32,
    pub usable: bool,
    pub locked: bool,
}

impl Portal {
    pub fn is_open(&self) -> bool {
        self.usable && !self.locked
    }
}

/// Portal label for a realm with `count` players.
///
/// ```
/// use realmsim_engine::realms::portal_label;
///
/// assert_eq!(portal_label("Medusa", 12, 85), "Medusa (12/85)");
/// assert_eq!(portal_label("Medusa", 90, 85), "Medusa (85/85)");
/// ```
pub fn portal_label(realm_name: &str, count: usize, max_players: usize) -> String {
    format!("{} ({}/{})", realm_name, count.min(max_players), max_players)
}

struct PortalEntry {
    portal: Portal,
    status: Arc<RealmStatus>,
}

struct RegistryState {
    portals: BTreeMap<WorldId, PortalEntry>,
    names: NamePool,
}

pub struct RealmRegistry {
    state: Mutex<RegistryState>,
    /// Hub tiles portals may stand on
    spots: Vec<Position>,
    max_realms: usize,
    player_count: Arc<dyn PlayerCountPort>,
    factory: Arc<dyn RealmFactoryPort>,
    rng: Arc<dyn RandomSource>,
}

impl RealmRegistry {
    pub fn new(
        names: NamePool,
        spots: Vec<Position>,
        max_realms: usize,
        player_count: Arc<dyn PlayerCountPort>,
        factory: Arc<dyn RealmFactoryPort>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                portals: BTreeMap::new(),
                names,
            }),
            spots,
            max_realms,
            player_count,
            factory,
            rng,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Portals
    // =========================================================================

    /// Register the portal for a newly created realm.
    ///
    /// Returns false if the realm already has one.
    pub fn add_portal(&self, status: Arc<RealmStatus>) -> bool {
        let mut state = self.lock();
        let world_id = status.world_id();
        if state.portals.contains_key(&world_id) {
            tracing::warn!(world_id = %world_id, "Duplicate portal registration ignored");
            return false;
        }

        let position = self.free_spot(&state);
        let realm_name = status.display_name().to_string();
        let portal = Portal {
            portal_id: EntityId::new(),
            world_id,
            name: portal_label(&realm_name, 0, status.max_players()),
            realm_name,
            position,
            size: PORTAL_SIZE,
            usable: true,
            locked: false,
        };
        tracing::info!(
            world_id = %world_id,
            portal = %portal.name,
            x = position.x,
            y = position.y,
            "Realm portal added"
        );
        state.portals.insert(world_id, PortalEntry { portal, status });
        true
    }

    /// Random unoccupied spot, centred on its tile. Falls back to the origin
    /// once every spot is taken.
    fn free_spot(&self, state: &RegistryState) -> Position {
        let free: Vec<Position> = self
            .spots
            .iter()
            .map(|spot| spot.offset(0.5, 0.5))
            .filter(|spot| !state.portals.values().any(|e| e.portal.position == *spot))
            .collect();
        if free.is_empty() {
            return Position::default();
        }
        let upper = i32::try_from(free.len()).unwrap_or(i32::MAX);
        let index = usize::try_from(self.rng.gen_range(0, upper)).unwrap_or(0);
        free.get(index).copied().unwrap_or_default()
    }

    /// Drop a realm's portal and return its name to the pool.
    pub fn remove_portal(&self, world_id: WorldId) -> bool {
        let mut state = self.lock();
        let Some(entry) = state.portals.remove(&world_id) else {
            return false;
        };
        state.names.release(&entry.portal.realm_name);
        tracing::info!(
            world_id = %world_id,
            realm = %entry.portal.realm_name,
            "Realm portal removed"
        );
        true
    }

    pub fn open_portal(&self, world_id: WorldId) -> bool {
        self.with_portal(world_id, |portal| portal.usable = true)
    }

    pub fn close_portal(&self, world_id: WorldId) -> bool {
        self.with_portal(world_id, |portal| portal.usable = false)
    }

    pub fn lock_portal(&self, world_id: WorldId, locked: bool) -> bool {
        self.with_portal(world_id, |portal| portal.locked = locked)
    }

    fn with_portal(&self, world_id: WorldId, f: impl FnOnce(&mut Portal)) -> bool {
        let mut state = self.lock();
        match state.portals.get_mut(&world_id) {
            Some(entry) => {
                f(&mut entry.portal);
                true
            }
            None => false,
        }
    }

    /// Usable and not locked. Unknown realms are closed.
    pub fn portal_is_open(&self, world_id: WorldId) -> bool {
        self.lock()
            .portals
            .get(&world_id)
            .is_some_and(|e| e.portal.is_open())
    }

    pub fn portal(&self, world_id: WorldId) -> Option<Portal> {
        self.lock().portals.get(&world_id).map(|e| e.portal.clone())
    }

    pub fn portals(&self) -> Vec<Portal> {
        self.lock()
            .portals
            .values()
            .map(|e| e.portal.clone())
            .collect()
    }

    pub fn active_realm_count(&self) -> usize {
        self.lock().names.active_count()
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Periodic maintenance: scale out if needed, close portals of closing
    /// realms and refresh population labels.
    pub fn update(&self) {
        let mut state = self.lock();
        self.create_realm_if_needed(&mut state);

        for entry in state.portals.values_mut() {
            if entry.status.is_closing() && entry.portal.usable {
                entry.portal.usable = false;
                tracing::info!(world_id = %entry.portal.world_id, "Realm closing, portal closed");
            }

            let label = portal_label(
                &entry.portal.realm_name,
                entry.status.player_count(),
                entry.status.max_players(),
            );
            if entry.portal.name != label {
                entry.portal.name = label;
            }
        }
    }

    /// Request a realm with a fresh name, regardless of load.
    pub fn create_new_realm(&self) -> bool {
        let mut state = self.lock();
        self.create_realm(&mut state)
    }

    fn create_realm_if_needed(&self, state: &mut RegistryState) {
        let active = state.names.active_count();
        if state.names.available_count() == 0 || active >= self.max_realms {
            return;
        }

        let total_players = self.player_count.connection_player_count();
        let realms_needed = 1 + total_players / (MAX_PER_REALM + SCALE_MARGIN);
        if active < realms_needed {
            self.create_realm(state);
        }
    }

    fn create_realm(&self, state: &mut RegistryState) -> bool {
        let Some(name) = state.names.take_random(self.rng.as_ref()) else {
            tracing::debug!("No realm names available, skipping realm creation");
            return false;
        };
        tracing::info!(realm = %name, active = state.names.active_count(), "Requesting new realm");
        self.factory.create_realm_async(name);
        true
    }
}
