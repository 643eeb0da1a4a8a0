//! Entity-related domain events

use crate::value_objects::{ClassificationSource, ConditionKind, Rarity};

/// Outcome of applying a hit to an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Entity was already dead, no effect
    AlreadyDead,
    /// A condition effect blocked the hit outright
    Blocked,
    /// Hit resolved but HP did not drop (Invulnerable)
    Absorbed { damage_dealt: i32 },
    /// Entity took damage but survived
    Wounded { damage_dealt: i32, remaining_hp: i32 },
    /// Entity was killed by this hit
    Killed { damage_dealt: i32 },
}

impl DamageOutcome {
    /// Amount reported back to the attacker.
    pub fn damage_dealt(&self) -> i32 {
        match self {
            Self::AlreadyDead | Self::Blocked => 0,
            Self::Absorbed { damage_dealt }
            | Self::Wounded { damage_dealt, .. }
            | Self::Killed { damage_dealt } => *damage_dealt,
        }
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

/// Outcome of healing an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealOutcome {
    /// Entity is dead, cannot heal
    Dead,
    /// Healing suppressed by a condition (Sick)
    Blocked,
    /// Already at max HP
    AlreadyFull,
    /// Healing applied
    Healed { amount_healed: i32, new_hp: i32 },
}

/// Result of the one-way `Alive -> Dead` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathTransition {
    /// First call: terminal hooks must run now
    Died,
    /// Re-entrant call, nothing to do
    AlreadyDead,
}

/// Outcome of one entity tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Entity was dead before the tick started
    AlreadyDead,
    /// Entity died during this tick
    Died { expired: Vec<ConditionKind> },
    /// Entity is still alive
    Ticked {
        expired: Vec<ConditionKind>,
        hp_lost: i32,
        hp_regenerated: i32,
    },
}

impl TickOutcome {
    pub fn died(&self) -> bool {
        matches!(self, Self::Died { .. })
    }

    /// Effects that ran out at the start of the tick.
    pub fn expired(&self) -> &[ConditionKind] {
        match self {
            Self::AlreadyDead => &[],
            Self::Died { expired } | Self::Ticked { expired, .. } => expired,
        }
    }
}

/// Outcome of a rarity classification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// Entity is not a quest/hero/encounter enemy
    NotEligible,
    /// An earlier classification already settled this entity
    AlreadyClassified,
    /// The random draw ran and missed
    Common,
    Upgraded {
        rarity: Rarity,
        source: ClassificationSource,
    },
}
