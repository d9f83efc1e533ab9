//! # Tick Scheduler
//!
//! Drives [`StreamPlayer::update`] at the audio quantum cadence from a tokio
//! task, for hosts without a hardware audio interrupt.

use crate::config::PlayerConfig;
use crate::player::StreamPlayer;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Calls `update()` on a player once per tick period until cancelled.
///
/// Late ticks are dropped rather than bursted, matching a pipeline that has
/// already moved on to the next quantum.
pub struct TickScheduler {
    player: Arc<StreamPlayer>,
    period: Duration,
    cancel: CancellationToken,
}

impl TickScheduler {
    /// Schedule `player` at [`PlayerConfig::tick_period`].
    pub fn new(player: Arc<StreamPlayer>, config: &PlayerConfig) -> Self {
        Self::with_period(player, config.tick_period())
    }

    /// Schedule `player` at an explicit period.
    pub fn with_period(player: Arc<StreamPlayer>, period: Duration) -> Self {
        Self {
            player,
            period,
            cancel: CancellationToken::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Token that stops the scheduler when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tick until cancelled. Returns the number of ticks issued.
    pub async fn run(self) -> u64 {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(period_us = self.period.as_micros() as u64, "Tick scheduler started");

        let mut ticks = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.player.update();
                    ticks += 1;
                }
            }
        }

        debug!(ticks, "Tick scheduler stopped");
        ticks
    }

    /// Run on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }
}
