//! # Playback & Streaming Module
//!
//! Streams raw 16-bit PCM from storage into a fixed-cadence audio pipeline.
//!
//! ## Overview
//!
//! This module handles:
//! - The [`StreamPlayer`] preload/play/stop state machine and its tick callback
//! - Byte offset to millisecond accounting ([`ByteTiming`])
//! - An in-process block pipeline ([`RingBufferSink`])
//! - A tokio-driven tick source ([`TickScheduler`])
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{PlayerConfig, RingBufferSink, StreamPlayer, TickScheduler};
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = PlayerConfig::default();
//! let sink = Arc::new(RingBufferSink::from_config(&config));
//! let core = CoreConfig::builder()
//!     .media_root("/media/sd")
//!     .block_sink(sink.clone())
//!     .build()?;
//!
//! let player = Arc::new(StreamPlayer::new(&core, config.clone())?);
//! player.preload("intro.raw", true)?;
//! let ticks = TickScheduler::new(player.clone(), &config).spawn();
//! player.play(false)?;
//! ```

pub mod config;
pub mod error;
pub mod player;
pub mod ring_buffer;
pub mod scheduler;
pub mod sink;
pub mod timing;

pub use config::{PlayerConfig, PlayerState, PlayerStats};
pub use error::{PlaybackError, Result};
pub use player::StreamPlayer;
pub use ring_buffer::RingBuffer;
pub use scheduler::TickScheduler;
pub use sink::RingBufferSink;
pub use timing::ByteTiming;
