//! StatValue and StatCache - per-entity stat storage with change tracking
//!
//! Writes mark a stat dirty only when the value actually changes. The owning
//! world drains the dirty set once per tick and turns it into a single stats
//! update, so a stat that changes five times in one tick is reported once
//! with its final value.

use std::collections::BTreeMap;

use super::StatId;

/// A single tracked value with a dirty flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatValue<T: Copy + PartialEq> {
    value: T,
    dirty: bool,
}

impl<T: Copy + PartialEq> StatValue<T> {
    /// Create a clean value.
    pub fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.value
    }

    /// Overwrite the value. Returns true when it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.dirty = true;
        true
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Mapping from stat id to its current value.
///
/// Single writer: only the owning world's tick mutates it.
#[derive(Debug, Clone, Default)]
pub struct StatCache {
    values: BTreeMap<StatId, StatValue<i32>>,
}

impl StatCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stat without marking it dirty (initial spawn values).
    pub fn with(mut self, stat: StatId, value: i32) -> Self {
        self.values.insert(stat, StatValue::new(value));
        self
    }

    /// Current value; unset stats read as 0.
    pub fn get(&self, stat: StatId) -> i32 {
        self.values.get(&stat).map(StatValue::get).unwrap_or(0)
    }

    /// Overwrite a stat, marking it dirty if the value changed.
    pub fn set(&mut self, stat: StatId, value: i32) {
        match self.values.get_mut(&stat) {
            Some(slot) => {
                slot.set(value);
            }
            None => {
                let mut slot = StatValue::new(0);
                slot.set(value);
                self.values.insert(stat, slot);
            }
        }
    }

    pub fn is_dirty(&self, stat: StatId) -> bool {
        self.values.get(&stat).is_some_and(StatValue::is_dirty)
    }

    /// Return and clear every changed stat, in stable stat order.
    pub fn drain_dirty(&mut self) -> Vec<(StatId, i32)> {
        self.values
            .iter_mut()
            .filter_map(|(stat, slot)| slot.take_dirty().then(|| (*stat, slot.get())))
            .collect()
    }

    /// Snapshot of every stat (full sync for a newly visible entity).
    pub fn snapshot(&self) -> Vec<(StatId, i32)> {
        self.values.iter().map(|(stat, v)| (*stat, v.get())).collect()
    }
}
