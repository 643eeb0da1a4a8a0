//! Entity aggregate - anything that lives in a world and ticks.
//!
//! # Invariants
//!
//! - HP stays within `[0, MaxHP]`
//! - `Alive -> Dead` happens exactly once; later calls report `AlreadyDead`
//! - At most one condition effect per kind
//! - A rarity upgrade happens at most once, from either path

use serde::{Deserialize, Serialize};

use crate::combat::{compute_damage, Hit};
use crate::events::{
    ClassificationOutcome, DamageOutcome, DeathTransition, HealOutcome, TickOutcome,
};
use crate::random::RandomSource;
use crate::tick_time::TickTime;
use crate::value_objects::{
    Accrual, Classification, ClassificationSource, ConditionEffectSet, ConditionKind,
    EntityState, Position, Rarity, SlotCooldowns, StatCache, StatId,
};
use crate::{DomainError, EntityId, WorldId};

/// HP lost per second while Bleeding.
pub const BLEED_HP_PER_SEC: u32 = 28;

/// Chance that a notable enemy is upgraded at spawn.
pub const RANDOM_UPGRADE_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Enemy,
    Player,
    Portal,
    Other,
}

/// Object-definition flags that make an enemy eligible for the random
/// rarity draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotableFlags {
    pub quest: bool,
    pub hero: bool,
    pub encounter: bool,
}

impl NotableFlags {
    pub fn is_notable(&self) -> bool {
        self.quest || self.hero || self.encounter
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    /// Object definition code, used to look up death handlers
    object_type: u16,
    name: String,
    position: Position,
    spawn_point: Position,
    stats: StatCache,
    conditions: ConditionEffectSet,
    /// Non-owning back reference, set when the entity enters a world
    world_id: Option<WorldId>,
    state: EntityState,
    notable: NotableFlags,
    classification: Classification,
    cooldowns: SlotCooldowns,
    regen: Accrual,
}

impl Entity {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a live entity at `position`. The position also becomes the
    /// spawn point.
    ///
    /// # Example
    ///
    /// ```
    /// use realmsim_domain::entities::{Entity, EntityKind};
    /// use realmsim_domain::value_objects::Position;
    ///
    /// let goblin = Entity::new(EntityKind::Enemy, 0x0d01, Position::new(4.0, 2.0))
    ///     .with_name("Goblin")
    ///     .with_hp(100)
    ///     .with_defense(10);
    ///
    /// assert!(goblin.is_alive());
    /// assert_eq!(goblin.hp(), 100);
    /// assert_eq!(goblin.max_hp(), 100);
    /// ```
    pub fn new(kind: EntityKind, object_type: u16, position: Position) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            object_type,
            name: String::new(),
            position,
            spawn_point: position,
            stats: StatCache::new(),
            conditions: ConditionEffectSet::new(),
            world_id: None,
            state: EntityState::Alive,
            notable: NotableFlags::default(),
            classification: Classification::Unclassified,
            cooldowns: SlotCooldowns::new(),
            regen: Accrual::new(),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Seed MaxHP and HP (full health). Spawn values are not reported as
    /// changes.
    pub fn with_hp(mut self, max_hp: i32) -> Self {
        let max_hp = max_hp.max(0);
        self.stats = self
            .stats
            .with(StatId::MaxHp, max_hp)
            .with(StatId::Hp, max_hp);
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.stats = self.stats.with(StatId::Defense, defense);
        self
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.stats = self.stats.with(StatId::Size, size);
        self
    }

    /// HP regenerated per second while nothing blocks healing.
    pub fn with_hp_regen(mut self, per_sec: i32) -> Self {
        self.stats = self.stats.with(StatId::HpRegen, per_sec.max(0));
        self
    }

    pub fn with_notable(mut self, notable: NotableFlags) -> Self {
        self.notable = notable;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[inline]
    pub fn object_type(&self) -> u16 {
        self.object_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    #[inline]
    pub fn spawn_point(&self) -> Position {
        self.spawn_point
    }

    #[inline]
    pub fn world_id(&self) -> Option<WorldId> {
        self.world_id
    }

    /// Record (or clear) the world this entity lives in.
    pub fn set_world(&mut self, world_id: Option<WorldId>) {
        self.world_id = world_id;
    }

    #[inline]
    pub fn state(&self) -> EntityState {
        self.state
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    pub fn notable(&self) -> NotableFlags {
        self.notable
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn stat(&self, stat: StatId) -> i32 {
        self.stats.get(stat)
    }

    pub fn stats(&self) -> &StatCache {
        &self.stats
    }

    #[inline]
    pub fn hp(&self) -> i32 {
        self.stats.get(StatId::Hp)
    }

    #[inline]
    pub fn max_hp(&self) -> i32 {
        self.stats.get(StatId::MaxHp)
    }

    #[inline]
    pub fn defense(&self) -> i32 {
        self.stats.get(StatId::Defense)
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.stats.get(StatId::Size)
    }

    #[inline]
    pub fn glow_color(&self) -> i32 {
        self.stats.get(StatId::GlowColor)
    }

    pub fn conditions(&self) -> &ConditionEffectSet {
        &self.conditions
    }

    pub fn has_condition(&self, kind: ConditionKind) -> bool {
        self.conditions.has(kind)
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Overwrite a stat. HP and MaxHP writes keep HP within `[0, MaxHP]`.
    pub fn set_stat(&mut self, stat: StatId, value: i32) {
        match stat {
            StatId::Hp => self.set_hp(value),
            StatId::MaxHp => self.set_max_hp(value),
            _ => self.stats.set(stat, value),
        }
    }

    fn set_hp(&mut self, value: i32) {
        let clamped = value.clamp(0, self.max_hp().max(0));
        self.stats.set(StatId::Hp, clamped);
    }

    fn set_max_hp(&mut self, value: i32) {
        let max_hp = value.max(0);
        self.stats.set(StatId::MaxHp, max_hp);
        if self.hp() > max_hp {
            self.stats.set(StatId::Hp, max_hp);
        }
    }

    /// Changed stats since the last drain, for the per-tick stats update.
    pub fn drain_stat_updates(&mut self) -> Vec<(StatId, i32)> {
        self.stats.drain_dirty()
    }

    // =========================================================================
    // Condition Effects
    // =========================================================================

    /// Apply or refresh an effect. `duration_ms == 0` is permanent.
    ///
    /// Returns true when the kind was not already active.
    pub fn apply_condition(&mut self, kind: ConditionKind, duration_ms: u32, now_ms: u64) -> bool {
        self.conditions.apply(kind, duration_ms, now_ms)
    }

    pub fn remove_condition(&mut self, kind: ConditionKind) -> bool {
        self.conditions.remove(kind)
    }

    // =========================================================================
    // Cooldowns
    // =========================================================================

    /// Start the slot's cooldown if it is ready.
    ///
    /// Returns `Ok(false)` while the slot is still cooling down.
    pub fn try_start_cooldown(
        &mut self,
        slot: usize,
        duration_ms: u64,
        now_ms: u64,
    ) -> Result<bool, DomainError> {
        if !self.cooldowns.is_ready(slot, now_ms)? {
            return Ok(false);
        }
        self.cooldowns.start(slot, duration_ms, now_ms)?;
        Ok(true)
    }

    // =========================================================================
    // Combat & Lifecycle
    // =========================================================================

    /// Resolve a hit against this entity.
    ///
    /// Blocking effects are checked first; then defense mitigation, the
    /// Invulnerable rule, HP loss, and finally the hit's own condition
    /// effects. Reaching 0 HP kills the entity immediately; the caller runs
    /// the death hooks on `Killed`.
    ///
    /// # Example
    ///
    /// ```
    /// use realmsim_domain::combat::Hit;
    /// use realmsim_domain::entities::{Entity, EntityKind};
    /// use realmsim_domain::value_objects::Position;
    /// use realmsim_domain::DamageOutcome;
    ///
    /// let mut enemy = Entity::new(EntityKind::Enemy, 1, Position::default())
    ///     .with_hp(100)
    ///     .with_defense(10);
    ///
    /// match enemy.take_damage(&Hit::new(50), 0) {
    ///     DamageOutcome::Wounded { damage_dealt, remaining_hp } => {
    ///         assert_eq!(damage_dealt, 40);
    ///         assert_eq!(remaining_hp, 60);
    ///     }
    ///     other => panic!("Expected Wounded outcome, got {:?}", other),
    /// }
    /// ```
    pub fn take_damage(&mut self, hit: &Hit, now_ms: u64) -> DamageOutcome {
        // Can't damage the dead
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }

        if self.conditions.blocks_damage(hit.is_poison) {
            return DamageOutcome::Blocked;
        }

        let mitigated = compute_damage(
            hit.amount,
            self.defense(),
            hit.ignore_defense,
            &self.conditions,
        );
        let current_hp = self.hp();
        let damage_dealt = mitigated.min(current_hp);
        let absorbed = self.conditions.prevents_hp_loss();

        if !absorbed {
            self.set_hp(current_hp - damage_dealt);
        }

        for (kind, duration_ms) in &hit.effects {
            self.conditions.apply(*kind, *duration_ms, now_ms);
        }

        if absorbed {
            return DamageOutcome::Absorbed { damage_dealt };
        }

        let remaining_hp = self.hp();
        if remaining_hp == 0 {
            self.mark_dead();
            DamageOutcome::Killed { damage_dealt }
        } else {
            DamageOutcome::Wounded {
                damage_dealt,
                remaining_hp,
            }
        }
    }

    /// Heal up to MaxHP. Suppressed while Sick.
    pub fn heal(&mut self, amount: i32) -> HealOutcome {
        if self.is_dead() {
            return HealOutcome::Dead;
        }
        if self.conditions.blocks_healing() {
            return HealOutcome::Blocked;
        }

        let current_hp = self.hp();
        let max_hp = self.max_hp();
        if current_hp >= max_hp {
            return HealOutcome::AlreadyFull;
        }

        let amount_healed = amount.max(0).min(max_hp - current_hp);
        self.set_hp(current_hp + amount_healed);
        HealOutcome::Healed {
            amount_healed,
            new_hp: self.hp(),
        }
    }

    /// One-way transition to `Dead`.
    pub fn mark_dead(&mut self) -> DeathTransition {
        if self.is_dead() {
            return DeathTransition::AlreadyDead;
        }
        self.state = EntityState::Dead;
        DeathTransition::Died
    }

    /// Advance this entity by one tick.
    ///
    /// Order: expire effects, die at 0 HP, bleed, regenerate. Bleeding and
    /// regeneration are suspended while Paused or in Stasis.
    pub fn tick(&mut self, time: &TickTime) -> TickOutcome {
        if self.is_dead() {
            return TickOutcome::AlreadyDead;
        }

        let expired = self.conditions.tick_expire(time.total_ms);

        if self.hp() == 0 {
            self.mark_dead();
            return TickOutcome::Died { expired };
        }

        let frozen = self.conditions.freezes_ticking();
        let hp_lost = if frozen { 0 } else { self.bleed(time.elapsed_ms) };

        if self.hp() == 0 {
            self.mark_dead();
            return TickOutcome::Died { expired };
        }

        let hp_regenerated = if frozen || self.conditions.blocks_healing() {
            0
        } else {
            self.regenerate(time.elapsed_ms)
        };

        TickOutcome::Ticked {
            expired,
            hp_lost,
            hp_regenerated,
        }
    }

    fn bleed(&mut self, elapsed_ms: u32) -> i32 {
        let Some(effect) = self.conditions.get_mut(ConditionKind::Bleeding) else {
            return 0;
        };
        let due = effect.accrual_mut().accrue(BLEED_HP_PER_SEC, elapsed_ms);
        let due = i32::try_from(due).unwrap_or(i32::MAX);

        let current_hp = self.hp();
        let lost = due.min(current_hp);
        self.set_hp(current_hp - lost);
        lost
    }

    fn regenerate(&mut self, elapsed_ms: u32) -> i32 {
        let rate = u32::try_from(self.stat(StatId::HpRegen)).unwrap_or(0);
        let current_hp = self.hp();
        let missing = self.max_hp() - current_hp;
        if rate == 0 || missing <= 0 {
            // Nothing banked while full
            self.regen.reset();
            return 0;
        }

        let due = self.regen.accrue(rate, elapsed_ms);
        let gained = i32::try_from(due).unwrap_or(i32::MAX).min(missing);
        self.set_hp(current_hp + gained);
        gained
    }

    // =========================================================================
    // Rarity Classification
    // =========================================================================

    /// Spawn-time random upgrade for quest/hero/encounter enemies.
    ///
    /// One draw per entity: 20% chance of Rare, Epic or Legendary, chosen
    /// uniformly. Size grows by `(tier+1) * 25`, MaxHP is multiplied by
    /// `tier+1` and HP is reset to the new maximum.
    pub fn classify_random(&mut self, rng: &dyn RandomSource) -> ClassificationOutcome {
        if !self.notable.is_notable() {
            return ClassificationOutcome::NotEligible;
        }
        if !self.classification.allows_roll() {
            return ClassificationOutcome::AlreadyClassified;
        }

        if rng.next_f64() >= RANDOM_UPGRADE_CHANCE {
            self.classification = Classification::Common;
            return ClassificationOutcome::Common;
        }

        let index = rng.gen_range(0, 3);
        let Some(rarity) = Rarity::from_index(index) else {
            self.classification = Classification::Common;
            return ClassificationOutcome::Common;
        };
        let multiplier = rarity.index() + 1;

        self.stats.set(StatId::GlowColor, rarity.rolled_glow());
        self.stats
            .set(StatId::Size, self.size().saturating_add(multiplier * 25));
        self.set_max_hp(self.max_hp().saturating_mul(multiplier));
        self.set_hp(self.max_hp());

        self.upgrade(rarity, ClassificationSource::Rolled)
    }

    /// Upgrade by configured tier name (`rare`, `epic`, `legendary`).
    ///
    /// Unknown names are rejected. Size is re-drawn within the tier's band
    /// only when it is positive.
    pub fn classify_configured(
        &mut self,
        tier: &str,
        rng: &dyn RandomSource,
    ) -> Result<ClassificationOutcome, DomainError> {
        let rarity: Rarity = tier.parse()?;
        if !self.classification.allows_configured() {
            return Ok(ClassificationOutcome::AlreadyClassified);
        }

        let (size_band, hp_multiplier, defense_bonus) = match rarity {
            Rarity::Rare => (0, 1, 2),
            Rarity::Epic => (100, 2, 5),
            Rarity::Legendary => (200, 3, 10),
        };

        let size = self.size();
        if size > 0 {
            let low = size.saturating_add(size_band);
            self.stats
                .set(StatId::Size, rng.gen_range(low, low.saturating_add(100)));
        }
        if hp_multiplier > 1 {
            self.set_max_hp(self.max_hp().saturating_mul(hp_multiplier));
            self.set_hp(self.max_hp());
        }
        self.stats
            .set(StatId::Defense, self.defense().saturating_add(defense_bonus));
        self.stats.set(StatId::GlowColor, rarity.configured_glow());

        Ok(self.upgrade(rarity, ClassificationSource::Configured))
    }

    fn upgrade(&mut self, rarity: Rarity, source: ClassificationSource) -> ClassificationOutcome {
        self.classification = Classification::Upgraded { rarity, source };
        ClassificationOutcome::Upgraded { rarity, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    fn enemy(max_hp: i32, defense: i32) -> Entity {
        Entity::new(EntityKind::Enemy, 0x0d01, Position::new(0.0, 0.0))
            .with_hp(max_hp)
            .with_defense(defense)
    }

    fn notable_enemy() -> Entity {
        enemy(1000, 5).with_size(100).with_notable(NotableFlags {
            hero: true,
            ..NotableFlags::default()
        })
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_entity_is_alive_at_full_health() {
            let e = enemy(100, 10).with_name("Goblin");
            assert!(e.is_alive());
            assert_eq!(e.hp(), 100);
            assert_eq!(e.max_hp(), 100);
            assert_eq!(e.defense(), 10);
            assert_eq!(e.name(), "Goblin");
            assert_eq!(e.world_id(), None);
            assert_eq!(e.spawn_point(), e.position());
        }

        #[test]
        fn spawn_values_are_not_reported_as_changes() {
            let mut e = enemy(100, 10);
            assert!(e.drain_stat_updates().is_empty());
        }
    }

    mod damage {
        use super::*;

        #[test]
        fn defense_mitigates_and_hp_drops() {
            let mut e = enemy(100, 10);
            let outcome = e.take_damage(&Hit::new(50), 0);
            assert_eq!(
                outcome,
                DamageOutcome::Wounded {
                    damage_dealt: 40,
                    remaining_hp: 60
                }
            );
            assert_eq!(e.drain_stat_updates(), vec![(StatId::Hp, 60)]);
        }

        #[test]
        fn lethal_hit_kills_once() {
            let mut e = enemy(100, 0);
            e.set_stat(StatId::Hp, 5);

            let first = e.take_damage(&Hit::new(20), 0);
            assert_eq!(first, DamageOutcome::Killed { damage_dealt: 5 });
            assert!(e.is_dead());
            assert_eq!(e.hp(), 0);

            let later = e.take_damage(&Hit::new(20), 0);
            assert_eq!(later, DamageOutcome::AlreadyDead);
            assert_eq!(later.damage_dealt(), 0);
        }

        #[test]
        fn hp_stays_in_range_for_any_hit() {
            for amount in [-50, 0, 1, 99, 100, 101, i32::MAX] {
                let mut e = enemy(100, 3);
                e.take_damage(&Hit::new(amount), 0);
                assert!((0..=100).contains(&e.hp()), "amount {amount}");
            }
        }

        #[test]
        fn invincible_blocks_non_poison() {
            let mut e = enemy(100, 0);
            e.apply_condition(ConditionKind::Invincible, 0, 0);

            let outcome = e.take_damage(&Hit::new(50).with_effect(ConditionKind::Slowed, 1000), 0);
            assert_eq!(outcome, DamageOutcome::Blocked);
            assert_eq!(e.hp(), 100);
            assert!(!e.has_condition(ConditionKind::Slowed));

            let poison = e.take_damage(&Hit::new(30).poison(), 0);
            assert_eq!(poison.damage_dealt(), 30);
            assert_eq!(e.hp(), 70);
        }

        #[test]
        fn stasis_blocks_poison_too() {
            let mut e = enemy(100, 0);
            e.apply_condition(ConditionKind::Stasis, 3000, 0);
            assert_eq!(e.take_damage(&Hit::new(30).poison(), 0), DamageOutcome::Blocked);
            assert_eq!(e.hp(), 100);
        }

        #[test]
        fn invulnerable_reports_damage_without_hp_loss() {
            let mut e = enemy(100, 10);
            e.apply_condition(ConditionKind::Invulnerable, 0, 0);

            let outcome = e.take_damage(&Hit::new(50).with_effect(ConditionKind::Slowed, 3000), 0);
            assert_eq!(outcome, DamageOutcome::Absorbed { damage_dealt: 40 });
            assert_eq!(e.hp(), 100);
            assert!(e.has_condition(ConditionKind::Slowed));
        }

        #[test]
        fn hit_effects_apply_after_damage() {
            let mut e = enemy(100, 0);
            e.take_damage(&Hit::new(10).with_effect(ConditionKind::Slowed, 3000), 500);
            let slowed = e.conditions().get(ConditionKind::Slowed);
            assert_eq!(slowed.map(|c| c.remaining_ms(500)), Some(Some(3000)));
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn mark_dead_transitions_once() {
            let mut e = enemy(10, 0);
            assert_eq!(e.mark_dead(), DeathTransition::Died);
            assert_eq!(e.mark_dead(), DeathTransition::AlreadyDead);
        }

        #[test]
        fn tick_kills_entity_at_zero_hp() {
            let mut e = enemy(10, 0);
            e.set_stat(StatId::Hp, 0);
            let outcome = e.tick(&TickTime::new(1, 200, 200));
            assert!(outcome.died());
            assert_eq!(e.tick(&TickTime::new(2, 200, 400)), TickOutcome::AlreadyDead);
        }

        #[test]
        fn expired_effects_are_removed_first() {
            let mut e = enemy(100, 0);
            e.apply_condition(ConditionKind::Stasis, 100, 0);
            e.apply_condition(ConditionKind::Bleeding, 0, 0);

            // Stasis ends at 100ms, so bleeding runs in this tick
            let outcome = e.tick(&TickTime::new(1, 500, 500));
            assert_eq!(outcome.expired(), &[ConditionKind::Stasis]);
            assert_eq!(e.hp(), 86);
        }

        #[test]
        fn bleeding_carries_fractional_hp() {
            let mut e = enemy(100, 0);
            e.apply_condition(ConditionKind::Bleeding, 0, 0);

            // 28 HP/s over 125ms = 3.5 HP
            let outcome = e.tick(&TickTime::new(1, 125, 125));
            assert!(matches!(outcome, TickOutcome::Ticked { hp_lost: 3, .. }));
            assert_eq!(e.hp(), 97);

            // Remaining 0.5 HP plus another 3.5 HP
            e.tick(&TickTime::new(2, 125, 250));
            assert_eq!(e.hp(), 93);
        }

        #[test]
        fn bleeding_is_frozen_by_pause() {
            let mut e = enemy(100, 0);
            e.apply_condition(ConditionKind::Bleeding, 0, 0);
            e.apply_condition(ConditionKind::Paused, 0, 0);
            e.tick(&TickTime::new(1, 1000, 1000));
            assert_eq!(e.hp(), 100);
        }

        #[test]
        fn bleeding_to_zero_kills() {
            let mut e = enemy(100, 0);
            e.set_stat(StatId::Hp, 10);
            e.apply_condition(ConditionKind::Bleeding, 0, 0);
            let outcome = e.tick(&TickTime::new(1, 1000, 1000));
            assert!(outcome.died());
            assert_eq!(e.hp(), 0);
        }

        #[test]
        fn regeneration_respects_sick_and_cap() {
            let mut e = enemy(100, 0).with_hp_regen(10);
            e.set_stat(StatId::Hp, 95);

            e.apply_condition(ConditionKind::Sick, 5000, 0);
            e.tick(&TickTime::new(1, 1000, 1000));
            assert_eq!(e.hp(), 95);

            e.remove_condition(ConditionKind::Sick);
            let outcome = e.tick(&TickTime::new(2, 1000, 2000));
            assert!(matches!(outcome, TickOutcome::Ticked { hp_regenerated: 5, .. }));
            assert_eq!(e.hp(), 100);
        }

        #[test]
        fn heal_caps_at_max_and_respects_sick() {
            let mut e = enemy(100, 0);
            e.set_stat(StatId::Hp, 80);
            assert_eq!(
                e.heal(50),
                HealOutcome::Healed {
                    amount_healed: 20,
                    new_hp: 100
                }
            );
            assert_eq!(e.heal(10), HealOutcome::AlreadyFull);

            e.set_stat(StatId::Hp, 50);
            e.apply_condition(ConditionKind::Sick, 0, 0);
            assert_eq!(e.heal(10), HealOutcome::Blocked);
        }

        #[test]
        fn lowering_max_hp_clamps_hp() {
            let mut e = enemy(100, 0);
            e.set_stat(StatId::MaxHp, 40);
            assert_eq!(e.hp(), 40);
        }

        #[test]
        fn cooldown_gates_repeat_triggers() {
            let mut e = enemy(10, 0);
            assert_eq!(e.try_start_cooldown(2, 4000, 0), Ok(true));
            assert_eq!(e.try_start_cooldown(2, 4000, 1000), Ok(false));
            assert_eq!(e.try_start_cooldown(2, 4000, 4000), Ok(true));
            assert!(e.try_start_cooldown(7, 4000, 0).is_err());
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn random_upgrade_scales_stats() {
            let mut e = notable_enemy();
            let rng = FixedRandom { roll: 0.1, pick: 2 };

            let outcome = e.classify_random(&rng);
            assert_eq!(
                outcome,
                ClassificationOutcome::Upgraded {
                    rarity: Rarity::Legendary,
                    source: ClassificationSource::Rolled
                }
            );
            assert_eq!(e.glow_color(), 0xD865A5);
            assert_eq!(e.size(), 175);
            assert_eq!(e.max_hp(), 3000);
            assert_eq!(e.hp(), 3000);
        }

        #[test]
        fn random_draw_happens_once() {
            let mut e = notable_enemy();
            let miss = FixedRandom { roll: 0.5, pick: 0 };
            let hit = FixedRandom { roll: 0.0, pick: 0 };

            assert_eq!(e.classify_random(&miss), ClassificationOutcome::Common);
            assert_eq!(
                e.classify_random(&hit),
                ClassificationOutcome::AlreadyClassified
            );
            assert_eq!(e.max_hp(), 1000);
        }

        #[test]
        fn ordinary_enemies_are_not_rolled() {
            let mut e = enemy(100, 0);
            let rng = FixedRandom { roll: 0.0, pick: 0 };
            assert_eq!(e.classify_random(&rng), ClassificationOutcome::NotEligible);
            assert_eq!(e.classification(), Classification::Unclassified);
        }

        #[test]
        fn configured_epic_applies_tier_table() {
            let mut e = notable_enemy();
            let rng = FixedRandom { roll: 0.0, pick: 250 };

            let outcome = e.classify_configured("Epic", &rng);
            assert!(matches!(
                outcome,
                Ok(ClassificationOutcome::Upgraded {
                    rarity: Rarity::Epic,
                    ..
                })
            ));
            assert_eq!(e.size(), 250);
            assert_eq!(e.max_hp(), 2000);
            assert_eq!(e.hp(), 2000);
            assert_eq!(e.defense(), 10);
            assert_eq!(e.glow_color(), 0x4B0082);
        }

        #[test]
        fn configured_rare_keeps_hp_and_zero_size() {
            let mut e = enemy(500, 0);
            e.set_stat(StatId::Hp, 200);
            let rng = FixedRandom { roll: 0.0, pick: 0 };

            assert!(e.classify_configured("rare", &rng).is_ok());
            assert_eq!(e.size(), 0);
            assert_eq!(e.hp(), 200);
            assert_eq!(e.max_hp(), 500);
            assert_eq!(e.defense(), 2);
            assert_eq!(e.glow_color(), 0xEAC117);
        }

        #[test]
        fn configured_path_after_common_roll() {
            let mut e = notable_enemy();
            let miss = FixedRandom { roll: 0.9, pick: 0 };
            e.classify_random(&miss);

            let outcome = e.classify_configured("legendary", &miss);
            assert!(matches!(outcome, Ok(ClassificationOutcome::Upgraded { .. })));
            assert_eq!(e.max_hp(), 3000);
        }

        #[test]
        fn upgrade_blocks_later_classification() {
            let mut e = notable_enemy();
            let rng = FixedRandom { roll: 0.0, pick: 0 };
            e.classify_random(&rng);
            let max_hp = e.max_hp();

            assert_eq!(
                e.classify_configured("legendary", &rng),
                Ok(ClassificationOutcome::AlreadyClassified)
            );
            assert_eq!(e.max_hp(), max_hp);
        }

        #[test]
        fn unknown_tier_is_rejected() {
            let mut e = notable_enemy();
            let rng = FixedRandom { roll: 0.0, pick: 0 };
            assert!(matches!(
                e.classify_configured("mythic", &rng),
                Err(DomainError::InvalidInput(_))
            ));
            assert_eq!(e.classification(), Classification::Unclassified);
        }
    }
}
