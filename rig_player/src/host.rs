//! Host-side pacing.
//!
//! Stands in for the engine's per-frame callback: ticks the player on a
//! `tokio` interval instead of sleeping inside the tick.

use std::time::Duration;

use rig_shared::scene::PositionTarget;
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::player::PointSequencePlayer;

/// Fixed-rate tick scheduler.
pub struct PacedHost {
    interval: Interval,
}

impl PacedHost {
    /// The first tick fires immediately.
    pub fn new(tick_interval: Duration) -> Self {
        let mut interval = time::interval(tick_interval);
        // A late host frame is dropped, not replayed in a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Waits for the next tick boundary.
    pub async fn wait(&mut self) {
        self.interval.tick().await;
    }

    /// Ticks `player` exactly `ticks` times at the host rate.
    pub async fn run_for_ticks<T: PositionTarget>(
        &mut self,
        player: &mut PointSequencePlayer<T>,
        ticks: u64,
    ) {
        for _ in 0..ticks {
            self.wait().await;
            player.tick();
        }
    }
}
