//! # In-process block pipeline
//!
//! [`RingBufferSink`] is a [`BlockSink`] that lands delivered blocks in a
//! [`RingBuffer`] for a consumer thread (an output device callback, a file
//! writer, a test) to drain.

use crate::config::PlayerConfig;
use crate::ring_buffer::RingBuffer;
use bridge_traits::{AudioBlock, BlockSink, AUDIO_BLOCK_SAMPLES};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Blocks kept in the allocation pool. One is in flight per tick.
const POOL_BLOCKS: usize = 2;

/// Block sink backed by a sample ring buffer.
///
/// All blocks are allocated at construction. [`allocate`](BlockSink::allocate)
/// reports saturation by returning `None` when the ring has no room for a
/// whole block or every pooled block is checked out.
pub struct RingBufferSink {
    ring: RingBuffer,
    pool: Mutex<Vec<AudioBlock>>,
    transmitted: AtomicU64,
}

impl RingBufferSink {
    /// Create a sink whose ring holds `blocks` audio blocks.
    pub fn new(blocks: usize) -> Self {
        let pool = (0..POOL_BLOCKS).map(|_| AudioBlock::new()).collect();
        Self {
            ring: RingBuffer::new(blocks * AUDIO_BLOCK_SAMPLES),
            pool: Mutex::new(pool),
            transmitted: AtomicU64::new(0),
        }
    }

    /// Create a sink sized by [`PlayerConfig::sink_blocks`].
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.sink_blocks)
    }

    /// Handle for the consuming side.
    pub fn reader(&self) -> RingBuffer {
        self.ring.clone()
    }

    /// Blocks delivered since construction.
    pub fn blocks_transmitted(&self) -> u64 {
        self.transmitted.load(Ordering::Relaxed)
    }

    /// Blocks currently available for allocation.
    pub fn pooled_blocks(&self) -> usize {
        self.pool.lock().len()
    }
}

impl BlockSink for RingBufferSink {
    fn allocate(&self) -> Option<AudioBlock> {
        if self.ring.free_space() < AUDIO_BLOCK_SAMPLES {
            return None;
        }
        self.pool.lock().pop()
    }

    fn transmit(&self, block: &AudioBlock) {
        let written = self.ring.write(block.samples());
        self.transmitted.fetch_add(1, Ordering::Relaxed);
        if written < AUDIO_BLOCK_SAMPLES {
            trace!(written, "Ring filled mid-block");
        }
    }

    fn release(&self, block: AudioBlock) {
        self.pool.lock().push(block);
    }
}
