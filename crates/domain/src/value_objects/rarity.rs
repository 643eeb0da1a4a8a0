//! Rarity tiers and the classification record that guards them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Upgrade tier for notable enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Tier for a random draw index (0 = Rare, 1 = Epic, 2 = Legendary).
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Rare),
            1 => Some(Self::Epic),
            2 => Some(Self::Legendary),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Rare => 0,
            Self::Epic => 1,
            Self::Legendary => 2,
        }
    }

    /// Marker colour used by the random path.
    pub fn rolled_glow(self) -> i32 {
        match self {
            Self::Rare => 0x82D9BC,
            Self::Epic => 0xC183AF,
            Self::Legendary => 0xD865A5,
        }
    }

    /// Marker colour used by the configured path.
    pub fn configured_glow(self) -> i32 {
        match self {
            Self::Rare => 0xEAC117,
            Self::Epic => 0x4B0082,
            Self::Legendary => 0xFFFFFF,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(DomainError::invalid_input(format!(
                "Unknown rarity tier: {}",
                other
            ))),
        }
    }
}

/// Which strategy produced an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassificationSource {
    Rolled,
    Configured,
}

/// What has happened to an entity's rarity so far.
///
/// ```text
/// Unclassified -> Common            (random draw missed)
/// Unclassified -> Upgraded{..}      (either path)
/// Common       -> Upgraded{Configured}
/// Upgraded     -> (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    #[default]
    Unclassified,
    /// The one-time random draw ran and did not upgrade
    Common,
    Upgraded {
        rarity: Rarity,
        source: ClassificationSource,
    },
}

impl Classification {
    pub fn rarity(&self) -> Option<Rarity> {
        match self {
            Self::Upgraded { rarity, .. } => Some(*rarity),
            _ => None,
        }
    }

    /// The random draw happens at most once.
    pub fn allows_roll(&self) -> bool {
        matches!(self, Self::Unclassified)
    }

    /// Configuration may upgrade anything not already upgraded.
    pub fn allows_configured(&self) -> bool {
        !matches!(self, Self::Upgraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tier_names() {
        assert_eq!("Legendary".parse::<Rarity>(), Ok(Rarity::Legendary));
        assert_eq!("epic".parse::<Rarity>(), Ok(Rarity::Epic));
        assert!(matches!(
            "mythic".parse::<Rarity>(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn index_round_trips() {
        for index in 0..3 {
            assert_eq!(Rarity::from_index(index).map(Rarity::index), Some(index));
        }
        assert_eq!(Rarity::from_index(3), None);
    }

    #[test]
    fn classification_guards() {
        assert!(Classification::Unclassified.allows_roll());
        assert!(!Classification::Common.allows_roll());
        assert!(Classification::Common.allows_configured());

        let upgraded = Classification::Upgraded {
            rarity: Rarity::Epic,
            source: ClassificationSource::Rolled,
        };
        assert!(!upgraded.allows_roll());
        assert!(!upgraded.allows_configured());
        assert_eq!(upgraded.rarity(), Some(Rarity::Epic));
    }
}
