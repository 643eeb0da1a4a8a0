//! Stat identifiers synchronised to clients.
//!
//! Provides type safety for stat references instead of raw wire codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Per-entity stats tracked by the `StatCache`.
///
/// Each stat has a stable wire code used by the outbound stats update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatId {
    /// Maximum hit points
    MaxHp,
    /// Current hit points
    Hp,
    /// Flat damage mitigation
    Defense,
    /// Render scale in percent
    Size,
    /// Rarity marker colour (0xRRGGBB)
    GlowColor,
    /// Hit points regenerated per second
    HpRegen,
    /// Stacked health potions
    HealthStackCount,
    /// Stacked magic potions
    MagicStackCount,
}

impl StatId {
    /// Wire code for this stat.
    pub fn code(self) -> u8 {
        match self {
            Self::MaxHp => 0,
            Self::Hp => 1,
            Self::Defense => 21,
            Self::Size => 2,
            Self::GlowColor => 59,
            Self::HpRegen => 26,
            Self::HealthStackCount => 110,
            Self::MagicStackCount => 111,
        }
    }

    /// Returns every known stat.
    pub fn all() -> [StatId; 8] {
        [
            Self::MaxHp,
            Self::Hp,
            Self::Defense,
            Self::Size,
            Self::GlowColor,
            Self::HpRegen,
            Self::HealthStackCount,
            Self::MagicStackCount,
        ]
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaxHp => "MAX_HP",
            Self::Hp => "HP",
            Self::Defense => "DEFENSE",
            Self::Size => "SIZE",
            Self::GlowColor => "GLOW_COLOR",
            Self::HpRegen => "HP_REGEN",
            Self::HealthStackCount => "HEALTH_STACK_COUNT",
            Self::MagicStackCount => "MAGIC_STACK_COUNT",
        };
        write!(f, "{}", name)
    }
}

impl TryFrom<u8> for StatId {
    type Error = DomainError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|stat| stat.code() == code)
            .ok_or_else(|| DomainError::invalid_input(format!("Unknown stat code: {}", code)))
    }
}
