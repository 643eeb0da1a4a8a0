//! Defense mitigation and hit description.

use crate::value_objects::{ConditionEffectSet, ConditionKind};

/// Curse amplifies mitigated damage by 5/4.
const CURSE_NUMERATOR: i64 = 5;
const CURSE_DENOMINATOR: i64 = 4;

/// One incoming hit.
///
/// # Example
///
/// ```
/// use realmsim_domain::combat::Hit;
/// use realmsim_domain::value_objects::ConditionKind;
///
/// let hit = Hit::new(120).ignoring_defense().with_effect(ConditionKind::Slowed, 3000);
/// assert!(hit.ignore_defense);
/// assert_eq!(hit.effects.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hit {
    pub amount: i32,
    pub ignore_defense: bool,
    /// Poison bypasses Invincible
    pub is_poison: bool,
    /// Effects applied to the target after the damage resolves
    pub effects: Vec<(ConditionKind, u32)>,
}

impl Hit {
    pub fn new(amount: i32) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    pub fn ignoring_defense(mut self) -> Self {
        self.ignore_defense = true;
        self
    }

    pub fn poison(mut self) -> Self {
        self.is_poison = true;
        self
    }

    pub fn with_effect(mut self, kind: ConditionKind, duration_ms: u32) -> Self {
        self.effects.push((kind, duration_ms));
        self
    }
}

/// Defense after condition modifiers: Armored doubles it, ArmorBroken
/// zeroes it, negative defense counts as none.
pub fn effective_defense(defense: i32, conditions: &ConditionEffectSet) -> i32 {
    if conditions.has(ConditionKind::ArmorBroken) {
        return 0;
    }
    let defense = defense.max(0);
    if conditions.has(ConditionKind::Armored) {
        defense.saturating_mul(2)
    } else {
        defense
    }
}

/// Damage left after the defender's defense.
///
/// Non-increasing in defense and never negative. Curse on the defender is
/// applied after mitigation.
///
/// # Example
///
/// ```
/// use realmsim_domain::combat::compute_damage;
/// use realmsim_domain::value_objects::ConditionEffectSet;
///
/// let none = ConditionEffectSet::new();
/// assert_eq!(compute_damage(50, 10, false, &none), 40);
/// assert_eq!(compute_damage(50, 10, true, &none), 50);
/// assert_eq!(compute_damage(5, 10, false, &none), 0);
/// ```
pub fn compute_damage(
    base_damage: i32,
    defender_defense: i32,
    ignore_defense: bool,
    conditions: &ConditionEffectSet,
) -> i32 {
    let base = base_damage.max(0);
    let mitigated = if ignore_defense {
        base
    } else {
        (base - effective_defense(defender_defense, conditions)).max(0)
    };

    if conditions.has(ConditionKind::Curse) {
        let cursed = i64::from(mitigated) * CURSE_NUMERATOR / CURSE_DENOMINATOR;
        i32::try_from(cursed).unwrap_or(i32::MAX)
    } else {
        mitigated
    }
}
