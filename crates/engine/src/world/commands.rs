//! Requests queued for a world by other tasks.
//!
//! The owning tick loop drains these at the start of every tick, so a
//! command always runs with exclusive access to the world.

use tokio::sync::oneshot;

use realmsim_domain::value_objects::ConditionKind;
use realmsim_domain::{ClassificationOutcome, DeathTransition, Entity, EntityId};

use super::{World, WorldError};
use crate::use_cases::combat::{ProcOutcome, ProcRequest};
use crate::use_cases::toggle_effect::{toggle_effect, ToggleOutcome};

/// Optional reply channel. A dropped receiver is not an error.
pub type Reply<T> = Option<oneshot::Sender<T>>;

#[derive(Debug)]
pub enum WorldCommand {
    Spawn {
        entity: Box<Entity>,
        reply: Reply<EntityId>,
    },
    Despawn {
        entity_id: EntityId,
    },
    Damage {
        target: EntityId,
        source: Option<EntityId>,
        amount: i32,
        ignore_defense: bool,
        is_poison: bool,
        effects: Vec<(ConditionKind, u32)>,
        reply: Reply<i32>,
    },
    Kill {
        entity_id: EntityId,
        reply: Reply<Result<DeathTransition, WorldError>>,
    },
    ToggleEffect {
        player: EntityId,
        effect: String,
        reply: Reply<Result<ToggleOutcome, WorldError>>,
    },
    Proc {
        request: ProcRequest,
        reply: Reply<Result<ProcOutcome, WorldError>>,
    },
    ClassifyConfigured {
        entity_id: EntityId,
        tier: String,
        reply: Reply<Result<ClassificationOutcome, WorldError>>,
    },
}

fn respond<T>(reply: Reply<T>, value: T) {
    if let Some(tx) = reply {
        // Caller stopped waiting
        let _ = tx.send(value);
    }
}

impl WorldCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn",
            Self::Despawn { .. } => "despawn",
            Self::Damage { .. } => "damage",
            Self::Kill { .. } => "kill",
            Self::ToggleEffect { .. } => "toggle_effect",
            Self::Proc { .. } => "proc",
            Self::ClassifyConfigured { .. } => "classify_configured",
        }
    }

    pub fn execute(self, world: &mut World) {
        match self {
            Self::Spawn { entity, reply } => {
                let id = world.add_entity(*entity);
                respond(reply, id);
            }
            Self::Despawn { entity_id } => {
                world.remove_entity(entity_id);
            }
            Self::Damage {
                target,
                source,
                amount,
                ignore_defense,
                is_poison,
                effects,
                reply,
            } => {
                let dealt =
                    world.apply_damage(target, source, amount, ignore_defense, is_poison, &effects);
                respond(reply, dealt);
            }
            Self::Kill { entity_id, reply } => {
                let result = world.kill(entity_id);
                log_rejection("kill", &result);
                respond(reply, result);
            }
            Self::ToggleEffect {
                player,
                effect,
                reply,
            } => {
                let result = toggle_effect(world, player, &effect);
                log_rejection("toggle_effect", &result);
                respond(reply, result);
            }
            Self::Proc { request, reply } => {
                let result = request.execute(world);
                log_rejection("proc", &result);
                respond(reply, result);
            }
            Self::ClassifyConfigured {
                entity_id,
                tier,
                reply,
            } => {
                let result = world.classify_configured(entity_id, &tier);
                log_rejection("classify_configured", &result);
                respond(reply, result);
            }
        }
    }
}

fn log_rejection<T>(command: &str, result: &Result<T, WorldError>) {
    if let Err(e) = result {
        tracing::debug!(command, error = %e, "World command rejected");
    }
}
