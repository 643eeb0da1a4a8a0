//! Per-enemy damage ledger used to credit kills.

use std::collections::HashMap;

use realmsim_domain::EntityId;

#[derive(Debug, Clone, Default)]
pub struct DamageCounter {
    hits: HashMap<EntityId, i64>,
}

impl DamageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record damage dealt by `player`. Non-positive amounts earn no credit.
    pub fn hit_by(&mut self, player: EntityId, amount: i32) {
        if amount <= 0 {
            return;
        }
        *self.hits.entry(player).or_insert(0) += i64::from(amount);
    }

    pub fn total(&self) -> i64 {
        self.hits.values().sum()
    }

    pub fn damage_by(&self, player: EntityId) -> i64 {
        self.hits.get(&player).copied().unwrap_or(0)
    }

    /// Credited players, highest damage first (ties by id).
    pub fn credits(&self) -> Vec<(EntityId, i32)> {
        let mut credits: Vec<(EntityId, i32)> = self
            .hits
            .iter()
            .map(|(player, dmg)| (*player, i32::try_from(*dmg).unwrap_or(i32::MAX)))
            .collect();
        credits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        credits
    }
}
