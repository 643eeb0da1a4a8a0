//! Value objects - small types defined by their attributes

mod accrual;
mod conditions;
mod cooldowns;
mod entity_state;
mod position;
mod rarity;
mod stat;
mod stat_cache;

pub use accrual::Accrual;
pub use conditions::{
    ConditionEffect, ConditionEffectSet, ConditionKind, ConditionProfile, DamageImmunity,
};
pub use cooldowns::{SlotCooldowns, PROC_SLOTS};
pub use entity_state::EntityState;
pub use position::Position;
pub use rarity::{Classification, ClassificationSource, Rarity};
pub use stat::StatId;
pub use stat_cache::{StatCache, StatValue};
