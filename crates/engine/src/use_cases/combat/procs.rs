//! Item procs triggered by a player's hit on an enemy.
//!
//! Each proc rolls against the world's random source. A roll that fails
//! leaves the world untouched; a successful one damages, heals and
//! broadcasts effects around the hit.

use realmsim_domain::combat::{select_chain, CHAIN_LENGTH};
use realmsim_domain::value_objects::{ConditionKind, Position};
use realmsim_domain::{EntityId, EntityKind, HealOutcome};
use realmsim_shared::{Argb, EffectType, ServerMessage, WirePosition};

use crate::world::{World, WorldError};

pub const VAMPIRIC_BASE_CHANCE: f64 = 0.03;
pub const VAMPIRIC_RADIUS: f32 = 3.0;
pub const VAMPIRIC_DAMAGE: i32 = 300;
pub const VAMPIRIC_HEAL: i32 = 50;
const VAMPIRIC_FLOWS: usize = 5;

pub const ELECTRIFY_CHANCE: f64 = 0.03;
pub const ELECTRIFY_HOP_RADIUS: f32 = 10.0;
pub const ELECTRIFY_DAMAGE: i32 = 1000;
pub const ELECTRIFY_SLOW_MS: u32 = 3000;

pub const DEMONIZED_CHANCE: f64 = 0.3;
pub const DEMONIZED_COOLDOWN_MS: u64 = 4000;
pub const DEMONIZED_CURSE_MS: u32 = 5000;

/// Result of a proc attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcOutcome {
    /// The player is missing, dead or not in this world
    Skipped,
    /// The roll (or cooldown) failed
    NoProc,
    /// The proc fired against these targets
    Triggered { targets: Vec<EntityId> },
}

impl ProcOutcome {
    pub fn triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// A proc to attempt, as queued by the hit resolution that caused it.
///
/// `hit_position` is captured at hit time; the first target may already be
/// gone when the proc runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcRequest {
    VampireBlast {
        player: EntityId,
        first_hit: EntityId,
        hit_position: Position,
        projectiles: u32,
        multi: bool,
    },
    Electrify {
        player: EntityId,
        first_hit: EntityId,
        hit_position: Position,
    },
    Demonized {
        player: EntityId,
        target: EntityId,
        slot: usize,
    },
}

impl ProcRequest {
    pub fn player(&self) -> EntityId {
        match self {
            Self::VampireBlast { player, .. }
            | Self::Electrify { player, .. }
            | Self::Demonized { player, .. } => *player,
        }
    }

    pub fn execute(self, world: &mut World) -> Result<ProcOutcome, WorldError> {
        match self {
            Self::VampireBlast {
                player,
                first_hit,
                hit_position,
                projectiles,
                multi,
            } => Ok(vampire_blast(
                world,
                player,
                first_hit,
                hit_position,
                projectiles,
                multi,
            )),
            Self::Electrify {
                player,
                first_hit,
                hit_position,
            } => Ok(electrify(world, player, first_hit, hit_position)),
            Self::Demonized {
                player,
                target,
                slot,
            } => demonized(world, player, target, slot),
        }
    }
}

/// Proc chance for the vampiric blast.
///
/// Every three projectiles on the weapon cost one percentage point; a hit
/// that struck several targets halves the chance.
///
/// ```
/// use realmsim_engine::use_cases::combat::vampiric_chance;
///
/// assert!((vampiric_chance(1, false) - 0.03).abs() < 1e-9);
/// assert!((vampiric_chance(3, true) - 0.01).abs() < 1e-9);
/// assert_eq!(vampiric_chance(12, false), 0.0);
/// ```
pub fn vampiric_chance(projectiles: u32, multi: bool) -> f64 {
    let chance = (VAMPIRIC_BASE_CHANCE - f64::from(projectiles / 3) / 100.0).max(0.0);
    if multi {
        chance / 2.0
    } else {
        chance
    }
}

/// Position of a live player that belongs to `world`.
fn live_player(world: &World, player: EntityId) -> Option<Position> {
    world
        .entity(player)
        .filter(|p| {
            p.kind() == EntityKind::Player && p.is_alive() && p.world_id() == Some(world.id())
        })
        .map(|p| p.position())
}

fn is_enemy(entity: &realmsim_domain::Entity) -> bool {
    entity.kind() == EntityKind::Enemy
}

// =============================================================================
// Vampiric Blast
// =============================================================================

pub fn vampire_blast(
    world: &mut World,
    player: EntityId,
    first_hit: EntityId,
    hit_position: Position,
    projectiles: u32,
    multi: bool,
) -> ProcOutcome {
    let Some(player_position) = live_player(world, player) else {
        return ProcOutcome::Skipped;
    };
    if world.rng().next_f64() >= vampiric_chance(projectiles, multi) {
        return ProcOutcome::NoProc;
    }

    let blast_at = WirePosition::new(hit_position.x, hit_position.y);
    world.broadcast_if_visible(
        ServerMessage::ShowEffect {
            effect_type: EffectType::Trail,
            target_id: first_hit.to_uuid(),
            color: Argb::RED,
            pos1: WirePosition::new(player_position.x, player_position.y),
            pos2: WirePosition::default(),
        },
        hit_position,
    );
    world.broadcast_if_visible(
        ServerMessage::ShowEffect {
            effect_type: EffectType::Diffuse,
            target_id: first_hit.to_uuid(),
            color: Argb::RED,
            pos1: blast_at,
            pos2: WirePosition::new(hit_position.x + VAMPIRIC_RADIUS, hit_position.y),
        },
        hit_position,
    );
    world.broadcast_if_visible(
        ServerMessage::Notification {
            object_id: first_hit.to_uuid(),
            player_id: Some(player.to_uuid()),
            message: "Vampiric!".to_string(),
            color: Argb::MAGENTA,
        },
        hit_position,
    );

    // Positions are captured up front; the blast may kill its targets
    let hit: Vec<(EntityId, Position)> = world
        .area_query(hit_position, VAMPIRIC_RADIUS, is_enemy)
        .into_iter()
        .filter_map(|id| world.entity(id).map(|e| (id, e.position())))
        .collect();
    for (target, _) in &hit {
        world.apply_damage(*target, Some(player), VAMPIRIC_DAMAGE, false, false, &[]);
    }

    heal_player(world, player, VAMPIRIC_HEAL);

    let still_hurt = world
        .entity(player)
        .is_some_and(|p| p.is_alive() && p.hp() < p.max_hp());
    if still_hurt && !hit.is_empty() {
        let upper = i32::try_from(hit.len()).unwrap_or(i32::MAX);
        for _ in 0..VAMPIRIC_FLOWS {
            let pick = usize::try_from(world.rng().gen_range(0, upper)).unwrap_or(0);
            let Some((_, from)) = hit.get(pick) else {
                continue;
            };
            world.broadcast_if_visible(
                ServerMessage::ShowEffect {
                    effect_type: EffectType::Flow,
                    target_id: player.to_uuid(),
                    color: Argb::WHITE,
                    pos1: WirePosition::new(from.x, from.y),
                    pos2: WirePosition::default(),
                },
                player_position,
            );
        }
    }

    tracing::debug!(
        world_id = %world.id(),
        player_id = %player,
        targets = hit.len(),
        "Vampiric blast"
    );
    ProcOutcome::Triggered {
        targets: hit.into_iter().map(|(id, _)| id).collect(),
    }
}

/// Heal a player, announcing the amount actually restored.
pub fn heal_player(world: &mut World, player: EntityId, amount: i32) -> HealOutcome {
    let Some(entity) = world.entity_mut(player) else {
        return HealOutcome::Dead;
    };
    let outcome = entity.heal(amount);
    let position = entity.position();

    if let HealOutcome::Healed { amount_healed, .. } = outcome {
        world.broadcast_if_visible(
            ServerMessage::ShowEffect {
                effect_type: EffectType::Potion,
                target_id: player.to_uuid(),
                color: Argb::WHITE,
                pos1: WirePosition::default(),
                pos2: WirePosition::default(),
            },
            position,
        );
        world.broadcast_if_visible(
            ServerMessage::Notification {
                object_id: player.to_uuid(),
                player_id: None,
                message: format!("+{}", amount_healed),
                color: Argb::GREEN,
            },
            position,
        );
    }
    outcome
}

// =============================================================================
// Electrify
// =============================================================================

pub fn electrify(
    world: &mut World,
    player: EntityId,
    first_hit: EntityId,
    hit_position: Position,
) -> ProcOutcome {
    let Some(player_position) = live_player(world, player) else {
        return ProcOutcome::Skipped;
    };
    if world.rng().next_f64() >= ELECTRIFY_CHANCE {
        return ProcOutcome::NoProc;
    }

    let chain = {
        let world = &*world;
        select_chain(first_hit, CHAIN_LENGTH, |current, selected| {
            let origin = world
                .entity(current)
                .map(|e| e.position())
                .unwrap_or(hit_position);
            world.nearest_entity(origin, ELECTRIFY_HOP_RADIUS, |e| {
                is_enemy(e)
                    && !e.has_condition(ConditionKind::Invincible)
                    && !e.has_condition(ConditionKind::Stasis)
                    && !selected.contains(&e.id())
            })
        })
    };
    let hops: Vec<(EntityId, Position)> = chain
        .iter()
        .map(|id| {
            let at = world.entity(*id).map(|e| e.position()).unwrap_or(hit_position);
            (*id, at)
        })
        .collect();

    let mut previous = player;
    for (target, at) in &hops {
        world.apply_damage(*target, Some(player), ELECTRIFY_DAMAGE, false, false, &[]);
        if world.entity(*target).is_some() {
            if let Err(e) = world.apply_condition(*target, ConditionKind::Slowed, ELECTRIFY_SLOW_MS) {
                tracing::warn!(entity_id = %target, error = %e, "Failed to slow electrified target");
            }
        }

        world.broadcast_if_visible(
            ServerMessage::ShowEffect {
                effect_type: EffectType::Lightning,
                target_id: previous.to_uuid(),
                color: Argb::YELLOW,
                pos1: WirePosition::new(at.x, at.y),
                pos2: WirePosition::new(350.0, 0.0),
            },
            player_position,
        );
        world.broadcast_if_visible(
            ServerMessage::Notification {
                object_id: target.to_uuid(),
                player_id: Some(player.to_uuid()),
                message: "Electrified!".to_string(),
                color: Argb::YELLOW,
            },
            player_position,
        );
        previous = *target;
    }

    tracing::debug!(
        world_id = %world.id(),
        player_id = %player,
        hops = chain.len(),
        "Electrify"
    );
    ProcOutcome::Triggered { targets: chain }
}

// =============================================================================
// Demonized
// =============================================================================

/// Curse the target. The slot goes on a four second cooldown when it fires.
pub fn demonized(
    world: &mut World,
    player: EntityId,
    target: EntityId,
    slot: usize,
) -> Result<ProcOutcome, WorldError> {
    let Some(player_position) = live_player(world, player) else {
        return Ok(ProcOutcome::Skipped);
    };
    if world.entity(target).is_none() {
        return Ok(ProcOutcome::Skipped);
    }
    if world.rng().next_f64() >= DEMONIZED_CHANCE {
        return Ok(ProcOutcome::NoProc);
    }

    let now_ms = world.time().total_ms;
    let Some(entity) = world.entity_mut(player) else {
        return Ok(ProcOutcome::Skipped);
    };
    if !entity.try_start_cooldown(slot, DEMONIZED_COOLDOWN_MS, now_ms)? {
        return Ok(ProcOutcome::NoProc);
    }

    world.apply_condition(target, ConditionKind::Curse, DEMONIZED_CURSE_MS)?;
    world.broadcast_if_visible(
        ServerMessage::ShowEffect {
            effect_type: EffectType::AreaBlast,
            target_id: target.to_uuid(),
            color: Argb::YELLOW,
            pos1: WirePosition::new(1.5, 0.0),
            pos2: WirePosition::default(),
        },
        player_position,
    );
    world.broadcast_if_visible(
        ServerMessage::Notification {
            object_id: target.to_uuid(),
            player_id: Some(player.to_uuid()),
            message: "Demonized!".to_string(),
            color: Argb::RED,
        },
        player_position,
    );

    Ok(ProcOutcome::Triggered {
        targets: vec![target],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use crate::test_fixtures::{enemy_at, player_at, test_world, test_world_with};
    use realmsim_domain::value_objects::StatId;
    use realmsim_domain::TickTime;

    fn count(messages: &[ServerMessage], text: &str) -> usize {
        messages
            .iter()
            .filter(|m| matches!(m, ServerMessage::Notification { message, .. } if message == text))
            .count()
    }

    mod chance {
        use super::*;

        #[test]
        fn projectiles_reduce_in_whole_points() {
            assert!((vampiric_chance(2, false) - 0.03).abs() < 1e-9);
            assert!((vampiric_chance(5, false) - 0.02).abs() < 1e-9);
            assert_eq!(vampiric_chance(9, false), 0.0);
        }

        #[test]
        fn multi_target_hits_halve_the_chance() {
            assert!((vampiric_chance(1, true) - 0.015).abs() < 1e-9);
        }
    }

    mod vampiric {
        use super::*;

        #[test]
        fn blast_damages_enemies_and_heals_player() {
            let (mut world, recorder) = test_world_with(FixedRandom::always());
            let mut hurt = player_at(0.0, 0.0);
            hurt.set_stat(StatId::Hp, 100);
            let player = world.add_entity(hurt);
            let first = world.add_entity(enemy_at(4.0, 0.0, 1000));
            let near = world.add_entity(enemy_at(5.0, 1.0, 1000));
            let far = world.add_entity(enemy_at(9.0, 0.0, 1000));

            let outcome = vampire_blast(&mut world, player, first, Position::new(4.0, 0.0), 1, false);

            let ProcOutcome::Triggered { targets } = outcome else {
                panic!("expected proc, got {:?}", outcome);
            };
            assert_eq!(targets.len(), 2);
            assert_eq!(world.entity(first).map(|e| e.hp()), Some(700));
            assert_eq!(world.entity(near).map(|e| e.hp()), Some(700));
            assert_eq!(world.entity(far).map(|e| e.hp()), Some(1000));
            assert_eq!(world.entity(player).map(|e| e.hp()), Some(150));

            let messages = recorder.messages_for(player);
            assert_eq!(count(&messages, "Vampiric!"), 1);
            assert_eq!(count(&messages, "+50"), 1);
            let flows = messages
                .iter()
                .filter(|m| matches!(m, ServerMessage::ShowEffect { effect_type: EffectType::Flow, .. }))
                .count();
            assert_eq!(flows, 5);
        }

        #[test]
        fn sick_player_is_not_healed() {
            let (mut world, recorder) = test_world_with(FixedRandom::always());
            let mut hurt = player_at(0.0, 0.0);
            hurt.set_stat(StatId::Hp, 100);
            let player = world.add_entity(hurt);
            world.apply_condition(player, ConditionKind::Sick, 0).expect("known");
            let first = world.add_entity(enemy_at(1.0, 0.0, 1000));

            assert!(vampire_blast(&mut world, player, first, Position::new(1.0, 0.0), 0, false).triggered());
            assert_eq!(world.entity(player).map(|e| e.hp()), Some(100));
            assert_eq!(count(&recorder.messages_for(player), "+50"), 0);
        }

        #[test]
        fn failed_roll_changes_nothing() {
            let (mut world, recorder) = test_world();
            let player = world.add_entity(player_at(0.0, 0.0));
            let first = world.add_entity(enemy_at(1.0, 0.0, 1000));

            assert_eq!(
                vampire_blast(&mut world, player, first, Position::new(1.0, 0.0), 0, false),
                ProcOutcome::NoProc
            );
            assert_eq!(world.entity(first).map(|e| e.hp()), Some(1000));
            assert!(recorder.all().is_empty());
        }

        #[test]
        fn missing_player_skips() {
            let (mut world, _) = test_world_with(FixedRandom::always());
            let first = world.add_entity(enemy_at(1.0, 0.0, 1000));
            assert_eq!(
                vampire_blast(&mut world, EntityId::new(), first, Position::new(1.0, 0.0), 0, false),
                ProcOutcome::Skipped
            );
        }
    }

    mod electrify {
        use super::*;

        #[test]
        fn chain_hops_to_nearest_and_never_repeats() {
            let (mut world, recorder) = test_world_with(FixedRandom::always());
            let player = world.add_entity(player_at(0.0, 0.0));
            let a = world.add_entity(enemy_at(2.0, 0.0, 5000));
            let b = world.add_entity(enemy_at(6.0, 0.0, 5000));
            let c = world.add_entity(enemy_at(12.0, 0.0, 5000));
            world.add_entity(enemy_at(40.0, 0.0, 5000));

            let outcome = electrify(&mut world, player, a, Position::new(2.0, 0.0));

            assert_eq!(outcome, ProcOutcome::Triggered { targets: vec![a, b, c] });
            for id in [a, b, c] {
                let enemy = world.entity(id).expect("alive");
                assert_eq!(enemy.hp(), 4000);
                assert!(enemy.has_condition(ConditionKind::Slowed));
            }
            assert_eq!(count(&recorder.messages_for(player), "Electrified!"), 3);
        }

        #[test]
        fn invincible_and_stasis_enemies_break_the_chain() {
            let (mut world, _) = test_world_with(FixedRandom::always());
            let player = world.add_entity(player_at(0.0, 0.0));
            let a = world.add_entity(enemy_at(2.0, 0.0, 5000));
            let shielded = world.add_entity(enemy_at(3.0, 0.0, 5000));
            let frozen = world.add_entity(enemy_at(4.0, 0.0, 5000));
            world
                .apply_condition(shielded, ConditionKind::Invincible, 0)
                .expect("known");
            world
                .apply_condition(frozen, ConditionKind::Stasis, 0)
                .expect("known");

            assert_eq!(
                electrify(&mut world, player, a, Position::new(2.0, 0.0)),
                ProcOutcome::Triggered { targets: vec![a] }
            );
        }

        #[test]
        fn killed_hops_are_not_slowed() {
            let (mut world, _) = test_world_with(FixedRandom::always());
            let player = world.add_entity(player_at(0.0, 0.0));
            let weak = world.add_entity(enemy_at(2.0, 0.0, 500));

            assert!(electrify(&mut world, player, weak, Position::new(2.0, 0.0)).triggered());
            assert!(world.entity(weak).is_none());
            assert_eq!(world.kill_count(), 1);
        }
    }

    mod demonized {
        use super::*;

        #[test]
        fn curses_target_and_starts_cooldown() {
            let (mut world, recorder) = test_world_with(FixedRandom::always());
            let player = world.add_entity(player_at(0.0, 0.0));
            let enemy = world.add_entity(enemy_at(2.0, 0.0, 1000));

            assert_eq!(
                demonized(&mut world, player, enemy, 1),
                Ok(ProcOutcome::Triggered { targets: vec![enemy] })
            );
            assert!(world.entity(enemy).is_some_and(|e| e.has_condition(ConditionKind::Curse)));
            assert_eq!(count(&recorder.messages_for(player), "Demonized!"), 1);

            // Cooling down
            assert_eq!(demonized(&mut world, player, enemy, 1), Ok(ProcOutcome::NoProc));

            world.tick(TickTime::new(1, 1000, DEMONIZED_COOLDOWN_MS));
            assert!(demonized(&mut world, player, enemy, 1).is_ok_and(|o| o.triggered()));
        }

        #[test]
        fn invalid_slot_is_rejected() {
            let (mut world, _) = test_world_with(FixedRandom::always());
            let player = world.add_entity(player_at(0.0, 0.0));
            let enemy = world.add_entity(enemy_at(2.0, 0.0, 1000));
            assert!(matches!(
                demonized(&mut world, player, enemy, 99),
                Err(WorldError::Domain(_))
            ));
        }

        #[test]
        fn dead_player_skips() {
            let (mut world, _) = test_world_with(FixedRandom::always());
            let mut corpse = player_at(0.0, 0.0);
            corpse.mark_dead();
            let player = world.add_entity(corpse);
            let enemy = world.add_entity(enemy_at(2.0, 0.0, 1000));
            assert_eq!(demonized(&mut world, player, enemy, 0), Ok(ProcOutcome::Skipped));
        }
    }
}
