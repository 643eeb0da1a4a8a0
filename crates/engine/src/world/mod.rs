//! Realm world - the entity container and the operations the rest of the
//! engine performs on it.
//!
//! A `World` is owned by exactly one task (see `tick`). Everything here is
//! synchronous and single-writer; other tasks reach a world only through
//! `WorldCommand`s or its published `RealmStatus`.

mod commands;
mod damage_counter;
mod status;

pub use commands::WorldCommand;
pub use damage_counter::DamageCounter;
pub use status::RealmStatus;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use realmsim_domain::combat::Hit;
use realmsim_domain::value_objects::{ConditionKind, Position, StatId};
use realmsim_domain::{
    ClassificationOutcome, DamageOutcome, DeathTransition, DomainError, Entity, EntityId, EntityKind,
    RandomSource, TickOutcome, TickTime, WorldId,
};
use realmsim_shared::{ServerMessage, StatUpdate};

use crate::infrastructure::ports::{BroadcastPort, DeathRecord, DefinitionsPort};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("Entity {entity_id} not found in world {world_id}")]
    UnknownEntity {
        world_id: WorldId,
        entity_id: EntityId,
    },
    #[error("Entity {entity_id} is not a player")]
    NotAPlayer { entity_id: EntityId },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

// =============================================================================
// Death Listeners
// =============================================================================

/// Observer notified once per entity death, after the definitions handler.
pub trait DeathListener: Send {
    fn on_death(&mut self, death: &DeathRecord);
}

impl<F> DeathListener for F
where
    F: FnMut(&DeathRecord) + Send,
{
    fn on_death(&mut self, death: &DeathRecord) {
        self(death)
    }
}

// =============================================================================
// World
// =============================================================================

/// Static settings for one realm.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSettings {
    pub display_name: String,
    pub max_players: usize,
    pub sight_radius: f32,
}

pub struct World {
    id: WorldId,
    settings: WorldSettings,
    /// Ordered by id so iteration (and therefore tie-breaking) is stable
    entities: BTreeMap<EntityId, Entity>,
    damage_counters: HashMap<EntityId, DamageCounter>,
    death_listeners: Vec<Box<dyn DeathListener>>,
    broadcast: Arc<dyn BroadcastPort>,
    definitions: Arc<dyn DefinitionsPort>,
    rng: Arc<dyn RandomSource>,
    time: TickTime,
    kill_count: u64,
    status: Arc<RealmStatus>,
}

impl World {
    pub fn new(
        id: WorldId,
        settings: WorldSettings,
        broadcast: Arc<dyn BroadcastPort>,
        definitions: Arc<dyn DefinitionsPort>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        let status = Arc::new(RealmStatus::new(
            id,
            settings.display_name.clone(),
            settings.max_players,
        ));
        Self {
            id,
            settings,
            entities: BTreeMap::new(),
            damage_counters: HashMap::new(),
            death_listeners: Vec::new(),
            broadcast,
            definitions,
            rng,
            time: TickTime::start(),
            kill_count: 0,
            status,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.settings.display_name
    }

    pub fn max_players(&self) -> usize {
        self.settings.max_players
    }

    pub fn sight_radius(&self) -> f32 {
        self.settings.sight_radius
    }

    /// The tick currently being processed (or the last one completed).
    pub fn time(&self) -> TickTime {
        self.time
    }

    pub fn kill_count(&self) -> u64 {
        self.kill_count
    }

    pub fn status(&self) -> Arc<RealmStatus> {
        Arc::clone(&self.status)
    }

    pub fn rng(&self) -> &dyn RandomSource {
        self.rng.as_ref()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn require_mut(&mut self, entity_id: EntityId) -> Result<&mut Entity, WorldError> {
        let world_id = self.id;
        self.entities
            .get_mut(&entity_id)
            .ok_or(WorldError::UnknownEntity {
                world_id,
                entity_id,
            })
    }

    /// Live player entity in this world.
    pub fn require_player(&self, entity_id: EntityId) -> Result<&Entity, WorldError> {
        let entity = self
            .entities
            .get(&entity_id)
            .ok_or(WorldError::UnknownEntity {
                world_id: self.id,
                entity_id,
            })?;
        if entity.kind() != EntityKind::Player {
            return Err(WorldError::NotAPlayer { entity_id });
        }
        Ok(entity)
    }

    /// Alive players currently in the world.
    pub fn player_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.kind() == EntityKind::Player && e.is_alive())
            .count()
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Add an entity, binding it to this world.
    ///
    /// Notable enemies get their one random rarity draw here.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        entity.set_world(Some(self.id));
        if entity.kind() == EntityKind::Enemy {
            if let ClassificationOutcome::Upgraded { rarity, .. } =
                entity.classify_random(self.rng.as_ref())
            {
                tracing::debug!(
                    world_id = %self.id,
                    entity_id = %entity.id(),
                    rarity = %rarity,
                    "Enemy upgraded at spawn"
                );
            }
        }
        let id = entity.id();
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity. Removing an absent entity is a no-op.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.damage_counters.remove(&id);
        let mut entity = self.entities.remove(&id)?;
        entity.set_world(None);
        tracing::trace!(world_id = %self.id, entity_id = %id, "Entity left world");
        Some(entity)
    }

    pub fn register_death_listener(&mut self, listener: impl DeathListener + 'static) {
        self.death_listeners.push(Box::new(listener));
    }

    // =========================================================================
    // Combat
    // =========================================================================

    /// Resolve a hit on `target` and return the damage reported back.
    ///
    /// Blocked hits, hits on the dead and hits on entities no longer in the
    /// world return 0 and send nothing. A hit that kills runs the death path
    /// before returning.
    pub fn apply_damage(
        &mut self,
        target: EntityId,
        source: Option<EntityId>,
        amount: i32,
        ignore_defense: bool,
        is_poison: bool,
        effects: &[(ConditionKind, u32)],
    ) -> i32 {
        let now_ms = self.time.total_ms;
        let hit = Hit {
            amount,
            ignore_defense,
            is_poison,
            effects: effects.to_vec(),
        };

        let Some(entity) = self.entities.get_mut(&target) else {
            tracing::trace!(world_id = %self.id, entity_id = %target, "Damage on absent entity ignored");
            return 0;
        };
        let outcome = entity.take_damage(&hit, now_ms);
        let position = entity.position();

        if matches!(outcome, DamageOutcome::AlreadyDead | DamageOutcome::Blocked) {
            return 0;
        }

        let damage_dealt = outcome.damage_dealt();
        self.broadcast_if_visible(
            ServerMessage::Damage {
                target_id: target.to_uuid(),
                source_id: source.map(EntityId::to_uuid),
                amount: damage_dealt,
                kill: outcome.is_kill(),
            },
            position,
        );

        if let Some(source) = source {
            self.damage_counters
                .entry(target)
                .or_default()
                .hit_by(source, damage_dealt);
        }

        if outcome.is_kill() {
            self.finish_death(target);
        }
        damage_dealt
    }

    /// Apply (or refresh) a condition effect on an entity at the current tick.
    pub fn apply_condition(
        &mut self,
        target: EntityId,
        kind: ConditionKind,
        duration_ms: u32,
    ) -> Result<bool, WorldError> {
        let now_ms = self.time.total_ms;
        Ok(self.require_mut(target)?.apply_condition(kind, duration_ms, now_ms))
    }

    pub fn remove_condition(
        &mut self,
        target: EntityId,
        kind: ConditionKind,
    ) -> Result<bool, WorldError> {
        Ok(self.require_mut(target)?.remove_condition(kind))
    }

    /// Configured rarity upgrade, e.g. from a spawn definition.
    pub fn classify_configured(
        &mut self,
        target: EntityId,
        tier: &str,
    ) -> Result<ClassificationOutcome, WorldError> {
        let rng = Arc::clone(&self.rng);
        let outcome = self.require_mut(target)?.classify_configured(tier, rng.as_ref())?;
        Ok(outcome)
    }

    /// Kill an entity outright (admin kill, despawn-with-loot).
    ///
    /// Death hooks run only on the first transition.
    pub fn kill(&mut self, target: EntityId) -> Result<DeathTransition, WorldError> {
        let transition = self.require_mut(target)?.mark_dead();
        match transition {
            DeathTransition::Died => self.finish_death(target),
            DeathTransition::AlreadyDead => {
                tracing::debug!(world_id = %self.id, entity_id = %target, "Kill ignored, already dead");
            }
        }
        Ok(transition)
    }

    /// Terminal hooks for an entity that has just transitioned to dead:
    /// damage credit, definition handler, listeners, kill counter, removal.
    fn finish_death(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let credited = self
            .damage_counters
            .remove(&id)
            .map(|counter| counter.credits())
            .unwrap_or_default();
        let death = DeathRecord {
            world_id: self.id,
            entity_id: id,
            object_type: entity.object_type(),
            name: entity.name().to_string(),
            position: entity.position(),
            credited,
        };

        if let Some(handler) = self.definitions.death_handler(death.object_type) {
            handler.handle(&death, self.broadcast.as_ref());
        }
        for listener in &mut self.death_listeners {
            listener.on_death(&death);
        }
        self.kill_count += 1;

        tracing::debug!(
            world_id = %self.id,
            entity_id = %id,
            object_type = death.object_type,
            credited = death.credited.len(),
            "Entity died"
        );
        self.remove_entity(id);
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Every live entity within `radius` of `center` accepted by `filter`,
    /// each exactly once.
    pub fn area_query(
        &self,
        center: Position,
        radius: f32,
        filter: impl Fn(&Entity) -> bool,
    ) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.is_alive() && e.position().within(&center, radius) && filter(e))
            .map(Entity::id)
            .collect()
    }

    /// Collect the area first, then run `apply` per target. Targets removed
    /// by an earlier callback are skipped.
    pub fn aoe(
        &mut self,
        center: Position,
        radius: f32,
        filter: impl Fn(&Entity) -> bool,
        mut apply: impl FnMut(&mut World, EntityId),
    ) -> Vec<EntityId> {
        let targets = self.area_query(center, radius, filter);
        for id in &targets {
            if self.entities.contains_key(id) {
                apply(self, *id);
            }
        }
        targets
    }

    /// Closest live entity within `radius` accepted by `filter`. Ties go to
    /// the lowest id.
    pub fn nearest_entity(
        &self,
        origin: Position,
        radius: f32,
        filter: impl Fn(&Entity) -> bool,
    ) -> Option<EntityId> {
        let radius_sq = radius * radius;
        let mut best: Option<(f32, EntityId)> = None;
        for entity in self.entities.values() {
            if !entity.is_alive() || !filter(entity) {
                continue;
            }
            let d = entity.position().dist_sq(&origin);
            if d > radius_sq {
                continue;
            }
            let closer = match best {
                Some((best_d, _)) => d < best_d,
                None => true,
            };
            if closer {
                best = Some((d, entity.id()));
            }
        }
        best.map(|(_, id)| id)
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Send `message` to every player within sight of `origin`.
    pub fn broadcast_if_visible(&self, message: ServerMessage, origin: Position) {
        let radius = self.settings.sight_radius;
        for player in self.entities.values().filter(|e| {
            e.kind() == EntityKind::Player && e.position().within(&origin, radius)
        }) {
            self.broadcast.send_to_player(player.id(), message.clone());
        }
    }

    /// Direct message to one player, regardless of position.
    pub fn send_to_player(&self, player: EntityId, message: ServerMessage) {
        self.broadcast.send_to_player(player, message);
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance every entity, run deaths, flush stat changes and publish the
    /// realm status.
    pub fn tick(&mut self, time: TickTime) {
        self.time = time;

        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            match entity.tick(&time) {
                TickOutcome::Died { .. } => self.finish_death(id),
                // Marked dead outside the death path; drop without hooks
                TickOutcome::AlreadyDead => {
                    self.remove_entity(id);
                }
                TickOutcome::Ticked { .. } => {}
            }
        }

        self.sync_stats();
        self.status.publish(self.player_count(), time.tick_count);
    }

    /// One coalesced stats update per changed entity.
    fn sync_stats(&mut self) {
        let mut updates = Vec::new();
        for entity in self.entities.values_mut() {
            let changed = entity.drain_stat_updates();
            if !changed.is_empty() {
                updates.push((entity.id(), entity.position(), changed));
            }
        }
        for (id, position, changed) in updates {
            self.broadcast_if_visible(
                ServerMessage::StatsUpdate {
                    object_id: id.to_uuid(),
                    stats: changed
                        .into_iter()
                        .map(|(stat, value): (StatId, i32)| StatUpdate {
                            code: stat.code(),
                            value,
                        })
                        .collect(),
                },
                position,
            );
        }
    }
}
