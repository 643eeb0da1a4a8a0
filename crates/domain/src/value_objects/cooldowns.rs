//! Per-slot proc cooldowns, compared against the tick clock.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Number of equipment slots that can carry a proc.
pub const PROC_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotCooldowns {
    ready_at_ms: [u64; PROC_SLOTS],
}

impl SlotCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(slot: usize) -> Result<usize, DomainError> {
        if slot < PROC_SLOTS {
            Ok(slot)
        } else {
            Err(DomainError::invalid_input(format!(
                "Proc slot {} out of range (0..{})",
                slot, PROC_SLOTS
            )))
        }
    }

    pub fn is_ready(&self, slot: usize, now_ms: u64) -> Result<bool, DomainError> {
        let index = Self::index(slot)?;
        Ok(now_ms >= self.ready_at_ms[index])
    }

    pub fn start(&mut self, slot: usize, duration_ms: u64, now_ms: u64) -> Result<(), DomainError> {
        let index = Self::index(slot)?;
        self.ready_at_ms[index] = now_ms + duration_ms;
        Ok(())
    }
}
