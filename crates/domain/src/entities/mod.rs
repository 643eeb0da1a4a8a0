//! Domain entities - Core simulation objects with identity

mod entity;

pub use entity::{Entity, EntityKind, NotableFlags, BLEED_HP_PER_SEC, RANDOM_UPGRADE_CHANCE};
