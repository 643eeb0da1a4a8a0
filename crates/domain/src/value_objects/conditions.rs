//! Condition effects - timed or permanent status modifiers on an entity.
//!
//! Each kind maps to a small static profile (default duration, whether it
//! freezes ticking, how it interacts with damage). Game logic reads the
//! profile instead of branching on individual kinds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::Accrual;
use crate::DomainError;

/// Fixed enumeration of condition effects.
///
/// Declaration order is the evaluation order used when iterating a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Immune to everything except poison
    Invincible,
    /// Takes hits (procs still fire) but loses no HP
    Invulnerable,
    /// Frozen in place by an admin or cutscene
    Paused,
    /// Frozen by an ability
    Stasis,
    /// Loses HP over time
    Bleeding,
    /// Reduced movement speed
    Slowed,
    /// Takes 25% more damage
    Curse,
    /// Cannot be healed
    Sick,
    /// Defense doubled
    Armored,
    /// Defense ignored
    ArmorBroken,
}

/// How a condition interacts with incoming damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageImmunity {
    /// No effect on damage
    None,
    /// Blocks damage unless it comes from poison
    NonPoison,
    /// Blocks every hit
    All,
    /// Hit resolves, HP does not drop
    HpLoss,
}

/// Static data for a condition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionProfile {
    /// Duration used when a caller does not specify one (0 = permanent)
    pub default_duration_ms: u32,
    /// Suspends tick-sensitive behaviour (bleeding, regeneration)
    pub freezes_ticking: bool,
    /// Suspends healing
    pub blocks_healing: bool,
    pub immunity: DamageImmunity,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 10] = [
        Self::Invincible,
        Self::Invulnerable,
        Self::Paused,
        Self::Stasis,
        Self::Bleeding,
        Self::Slowed,
        Self::Curse,
        Self::Sick,
        Self::Armored,
        Self::ArmorBroken,
    ];

    pub fn profile(self) -> ConditionProfile {
        let (default_duration_ms, freezes_ticking, blocks_healing, immunity) = match self {
            Self::Invincible => (0, false, false, DamageImmunity::NonPoison),
            Self::Invulnerable => (0, false, false, DamageImmunity::HpLoss),
            Self::Paused => (0, true, false, DamageImmunity::All),
            Self::Stasis => (3000, true, false, DamageImmunity::All),
            Self::Bleeding => (5000, false, false, DamageImmunity::None),
            Self::Slowed => (3000, false, false, DamageImmunity::None),
            Self::Curse => (5000, false, false, DamageImmunity::None),
            Self::Sick => (5000, false, true, DamageImmunity::None),
            Self::Armored => (5000, false, false, DamageImmunity::None),
            Self::ArmorBroken => (5000, false, false, DamageImmunity::None),
        };
        ConditionProfile {
            default_duration_ms,
            freezes_ticking,
            blocks_healing,
            immunity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invincible => "Invincible",
            Self::Invulnerable => "Invulnerable",
            Self::Paused => "Paused",
            Self::Stasis => "Stasis",
            Self::Bleeding => "Bleeding",
            Self::Slowed => "Slowed",
            Self::Curse => "Curse",
            Self::Sick => "Sick",
            Self::Armored => "Armored",
            Self::ArmorBroken => "ArmorBroken",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConditionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainError::invalid_input(format!("Unknown condition effect: {}", wanted))
            })
    }
}

/// An active effect on one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionEffect {
    kind: ConditionKind,
    /// 0 = permanent until explicitly removed
    duration_ms: u32,
    applied_at_ms: u64,
    accrual: Accrual,
}

impl ConditionEffect {
    fn new(kind: ConditionKind, duration_ms: u32, applied_at_ms: u64) -> Self {
        Self {
            kind,
            duration_ms,
            applied_at_ms,
            accrual: Accrual::new(),
        }
    }

    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn applied_at_ms(&self) -> u64 {
        self.applied_at_ms
    }

    pub fn is_permanent(&self) -> bool {
        self.duration_ms == 0
    }

    /// Remaining time at `now_ms`; `None` for permanent effects.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if self.is_permanent() {
            return None;
        }
        let ends_at = self.applied_at_ms + u64::from(self.duration_ms);
        Some(ends_at.saturating_sub(now_ms))
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.remaining_ms(now_ms) == Some(0)
    }

    /// Damage-over-time state attached to this effect.
    pub fn accrual_mut(&mut self) -> &mut Accrual {
        &mut self.accrual
    }
}

/// The set of active effects on one entity. At most one entry per kind.
#[derive(Debug, Clone, Default)]
pub struct ConditionEffectSet {
    effects: BTreeMap<ConditionKind, ConditionEffect>,
}

impl ConditionEffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: ConditionKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn get(&self, kind: ConditionKind) -> Option<&ConditionEffect> {
        self.effects.get(&kind)
    }

    pub fn get_mut(&mut self, kind: ConditionKind) -> Option<&mut ConditionEffect> {
        self.effects.get_mut(&kind)
    }

    /// Insert or refresh an effect.
    ///
    /// Re-applying an active kind replaces its duration and restarts the
    /// timer; accrued damage-over-time is kept. Returns true when the kind
    /// was not active before.
    pub fn apply(&mut self, kind: ConditionKind, duration_ms: u32, now_ms: u64) -> bool {
        match self.effects.get_mut(&kind) {
            Some(existing) => {
                existing.duration_ms = duration_ms;
                existing.applied_at_ms = now_ms;
                false
            }
            None => {
                self.effects
                    .insert(kind, ConditionEffect::new(kind, duration_ms, now_ms));
                true
            }
        }
    }

    /// Explicit removal. Returns true when the kind was active.
    pub fn remove(&mut self, kind: ConditionKind) -> bool {
        self.effects.remove(&kind).is_some()
    }

    /// Drop every effect whose duration has elapsed, returning the kinds
    /// removed.
    pub fn tick_expire(&mut self, now_ms: u64) -> Vec<ConditionKind> {
        let expired: Vec<ConditionKind> = self
            .effects
            .values()
            .filter(|e| e.is_expired(now_ms))
            .map(ConditionEffect::kind)
            .collect();
        for kind in &expired {
            self.effects.remove(kind);
        }
        expired
    }

    /// Any active effect suspends tick-sensitive behaviour (OR of all).
    pub fn freezes_ticking(&self) -> bool {
        self.effects.keys().any(|k| k.profile().freezes_ticking)
    }

    pub fn blocks_healing(&self) -> bool {
        self.effects.keys().any(|k| k.profile().blocks_healing)
    }

    /// Whether any active effect blocks the hit outright.
    pub fn blocks_damage(&self, is_poison: bool) -> bool {
        self.effects.keys().any(|k| match k.profile().immunity {
            DamageImmunity::All => true,
            DamageImmunity::NonPoison => !is_poison,
            DamageImmunity::None | DamageImmunity::HpLoss => false,
        })
    }

    pub fn prevents_hp_loss(&self) -> bool {
        self.effects
            .keys()
            .any(|k| k.profile().immunity == DamageImmunity::HpLoss)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ConditionKind> + '_ {
        self.effects.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
