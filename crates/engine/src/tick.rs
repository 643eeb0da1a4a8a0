//! Per-realm tick loop.
//!
//! Each realm's `World` lives inside exactly one `WorldLoop`, which runs on
//! its own task: drain queued commands, advance the tick clock, tick the
//! world. A realm with a lifetime closes when it elapses and retires once
//! the last player has left.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::ClockPort;
use crate::world::{World, WorldCommand};

/// Timing for one realm loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub tick_interval: Duration,
    pub max_tick_delta_ms: u32,
    /// `None` keeps the realm open forever
    pub lifetime: Option<Duration>,
}

pub struct WorldLoop {
    world: World,
    commands: mpsc::UnboundedReceiver<WorldCommand>,
    clock: Arc<dyn ClockPort>,
    settings: LoopSettings,
    started_ms: u64,
    last_ms: u64,
}

impl WorldLoop {
    pub fn new(
        world: World,
        commands: mpsc::UnboundedReceiver<WorldCommand>,
        clock: Arc<dyn ClockPort>,
        settings: LoopSettings,
    ) -> Self {
        let now = clock.now_ms();
        Self {
            world,
            commands,
            clock,
            settings,
            started_ms: now,
            last_ms: now,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run one tick. Returns false once the realm should retire.
    pub fn step(&mut self) -> bool {
        while let Ok(command) = self.commands.try_recv() {
            tracing::trace!(world_id = %self.world.id(), command = command.name(), "World command");
            command.execute(&mut self.world);
        }

        let now = self.clock.now_ms();
        let elapsed = u32::try_from(now.saturating_sub(self.last_ms)).unwrap_or(u32::MAX);
        self.last_ms = now;

        let time = self
            .world
            .time()
            .advance(elapsed, self.settings.max_tick_delta_ms);
        self.world.tick(time);

        let status = self.world.status();
        if let Some(lifetime) = self.settings.lifetime {
            let lifetime_ms = u64::try_from(lifetime.as_millis()).unwrap_or(u64::MAX);
            if now.saturating_sub(self.started_ms) >= lifetime_ms && status.mark_closing() {
                tracing::info!(
                    world_id = %self.world.id(),
                    realm = %self.world.display_name(),
                    "Realm lifetime elapsed, closing"
                );
            }
        }

        !(status.is_closing() && self.world.player_count() == 0)
    }

    /// Tick until cancelled or retired. Returns the world for inspection.
    pub async fn run(mut self, cancel: CancellationToken) -> World {
        let mut interval = tokio::time::interval(self.settings.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            world_id = %self.world.id(),
            realm = %self.world.display_name(),
            "Realm loop started"
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(world_id = %self.world.id(), "Realm loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if !self.step() {
                        tracing::info!(
                            world_id = %self.world.id(),
                            kills = self.world.kill_count(),
                            "Realm retired"
                        );
                        break;
                    }
                }
            }
        }

        self.world.status().mark_retired();
        self.world
    }
}
