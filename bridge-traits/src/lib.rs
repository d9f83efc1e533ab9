//! # Host Bridge Traits
//!
//! Capability traits that the streaming core consumes but never implements.
//!
//! ## Overview
//!
//! The playback core is written against a handful of narrow interfaces so that
//! the same state machine can drive an SD card on a microcontroller, a file on
//! a desktop disk, or an in-memory fixture in tests. Each trait represents one
//! external collaborator:
//!
//! ### Storage
//! - [`SourceOpener`](storage::SourceOpener) - Resolves a name into an open byte source
//! - [`SourceHandle`](storage::SourceHandle) - Sequential read / rewind / size of one open source
//!
//! ### Hardware
//! - [`BusArbiter`](bus::BusArbiter) - Acquire/release of a bus shared with the storage device
//!
//! ### Audio pipeline
//! - [`BlockSink`](playback::BlockSink) - Allocate, transmit and release fixed-size sample blocks
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Notes |
//! |----------|---------------------|-------|
//! | Desktop  | `bridge-desktop`    | `std::fs` sources, reference-counted bus |
//! | Tests    | in-crate fixtures   | in-memory sources, mock buses |
//!
//! ## Real-Time Constraints
//!
//! [`SourceHandle::read`](storage::SourceHandle::read),
//! [`BlockSink::allocate`](playback::BlockSink::allocate),
//! [`BlockSink::transmit`](playback::BlockSink::transmit) and
//! [`BlockSink::release`](playback::BlockSink::release) are called from the
//! tick callback. Implementations must not allocate or wait on locks held by
//! slow code in those methods.
//!
//! ## Error Handling
//!
//! Fallible capabilities return [`BridgeError`](error::BridgeError). The core
//! absorbs these locally and converts them into state transitions; nothing is
//! propagated across the real-time boundary.

pub mod bus;
pub mod error;
pub mod playback;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use bus::{BusArbiter, UncontendedBus};
pub use playback::{AudioBlock, BlockSink, AUDIO_BLOCK_BYTES, AUDIO_BLOCK_SAMPLES};
pub use storage::{SourceHandle, SourceOpener};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
