//! Cross-task view of a realm.
//!
//! The owning world task is the only writer. Everyone else (registry,
//! server) reads these atomics without touching the world itself.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use realmsim_domain::WorldId;

#[derive(Debug)]
pub struct RealmStatus {
    world_id: WorldId,
    display_name: String,
    max_players: usize,
    player_count: AtomicUsize,
    tick_count: AtomicU64,
    closing: AtomicBool,
    retired: AtomicBool,
}

impl RealmStatus {
    pub fn new(world_id: WorldId, display_name: impl Into<String>, max_players: usize) -> Self {
        Self {
            world_id,
            display_name: display_name.into(),
            max_players,
            player_count: AtomicUsize::new(0),
            tick_count: AtomicU64::new(0),
            closing: AtomicBool::new(false),
            retired: AtomicBool::new(false),
        }
    }

    pub fn world_id(&self) -> WorldId {
        self.world_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Publish the result of a tick.
    pub fn publish(&self, player_count: usize, tick_count: u64) {
        self.player_count.store(player_count, Ordering::Release);
        self.tick_count.store(tick_count, Ordering::Release);
    }

    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Acquire)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Acquire)
    }

    /// Stop accepting players. Returns true on the first call.
    pub fn mark_closing(&self) -> bool {
        !self.closing.swap(true, Ordering::AcqRel)
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    /// The world loop has ended. Returns true on the first call.
    pub fn mark_retired(&self) -> bool {
        !self.retired.swap(true, Ordering::AcqRel)
    }

    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_is_visible_to_readers() {
        let status = RealmStatus::new(WorldId::new(), "Lich", 85);
        status.publish(12, 40);
        assert_eq!(status.player_count(), 12);
        assert_eq!(status.tick_count(), 40);
    }

    #[test]
    fn closing_and_retiring_report_first_transition_only() {
        let status = RealmStatus::new(WorldId::new(), "Lich", 85);
        assert!(status.mark_closing());
        assert!(!status.mark_closing());
        assert!(status.is_closing());
        assert!(status.mark_retired());
        assert!(!status.mark_retired());
    }
}
