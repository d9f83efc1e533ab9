//! # Player Configuration
//!
//! Configuration and state types for the streaming player.

use crate::timing::ByteTiming;
use bridge_traits::AUDIO_BLOCK_SAMPLES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Player configuration.
///
/// Controls the sample rate used for position accounting and scheduling, and
/// the depth of the in-process block pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Exact sample rate of the audio pipeline in Hz.
    ///
    /// Sources are 16-bit mono, so one second of audio is `2 * sample_rate`
    /// bytes.
    ///
    /// Default: 44100.0.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Capacity of a [`RingBufferSink`](crate::sink::RingBufferSink) in blocks.
    ///
    /// Default: 8 blocks (~23ms at 44.1kHz).
    #[serde(default = "default_sink_blocks")]
    pub sink_blocks: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            sink_blocks: default_sink_blocks(),
        }
    }
}

impl PlayerConfig {
    /// Configuration matching the Teensy 3.x audio clock (44117.64706 Hz).
    pub fn teensy3() -> Self {
        Self {
            sample_rate: 44_117.647_06,
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !ByteTiming::supports(self.sample_rate) {
            return Err(format!(
                "sample_rate must be a finite value above 500 Hz, got {}",
                self.sample_rate
            ));
        }

        if self.sink_blocks == 0 {
            return Err("sink_blocks must be > 0".to_string());
        }

        Ok(())
    }

    /// Duration of one audio block, i.e. the tick period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(AUDIO_BLOCK_SAMPLES as f64 / self.sample_rate)
    }

    /// Capacity of the sink ring buffer in samples.
    pub fn sink_samples(&self) -> usize {
        self.sink_blocks * AUDIO_BLOCK_SAMPLES
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_sample_rate() -> f64 {
    44_100.0
}

fn default_sink_blocks() -> usize {
    8
}

// ============================================================================
// Player State
// ============================================================================

/// Resting state of the player.
///
/// "Stopped" is not a resting state: a stop or end of stream immediately
/// resolves to [`Preloaded`](PlayerState::Preloaded) when the source is kept
/// and rewound, and to [`Closed`](PlayerState::Closed) otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No source open.
    Closed,
    /// Source open and positioned, not playing.
    Preloaded,
    /// Emitting one block per tick.
    Playing,
}

impl PlayerState {
    /// Returns `true` if a source is open.
    pub fn has_source(&self) -> bool {
        matches!(self, Self::Preloaded | Self::Playing)
    }
}

/// Counters describing what the tick callback has done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStats {
    /// Blocks handed to the sink.
    pub blocks_delivered: u64,
    /// Blocks delivered from the priming buffer rather than a fresh read.
    pub primed_blocks: u64,
    /// Ticks skipped because the sink had no free block.
    pub sink_saturated_ticks: u64,
    /// Times a looping source was rewound to the start.
    pub loop_restarts: u64,
    /// Times playback ended because the source was exhausted.
    pub end_of_stream: u64,
}

impl PlayerStats {
    /// Fraction of delivered blocks that came from the priming buffer.
    pub fn primed_ratio(&self) -> f32 {
        if self.blocks_delivered == 0 {
            return 0.0;
        }
        self.primed_blocks as f32 / self.blocks_delivered as f32
    }
}
