//! Playback bridge traits and the fixed-size audio block.
//!
//! The audio pipeline runs on a fixed quantum of [`AUDIO_BLOCK_SAMPLES`]
//! samples. Producers obtain blocks from a [`BlockSink`], fill them, hand them
//! over with [`BlockSink::transmit`] and always give ownership back with
//! [`BlockSink::release`], whether the block was delivered or discarded.

/// Number of 16-bit samples in one audio block (one pipeline tick).
pub const AUDIO_BLOCK_SAMPLES: usize = 128;

/// Size of one audio block in bytes of raw 16-bit PCM.
pub const AUDIO_BLOCK_BYTES: usize = AUDIO_BLOCK_SAMPLES * 2;

/// One quantum of interleaved 16-bit samples.
///
/// Blocks are heap-allocated once by the sink and recycled; the tick callback
/// never constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlock {
    samples: Box<[i16; AUDIO_BLOCK_SAMPLES]>,
}

impl AudioBlock {
    /// Allocate a silent block.
    pub fn new() -> Self {
        Self {
            samples: Box::new([0; AUDIO_BLOCK_SAMPLES]),
        }
    }

    /// Borrow the samples.
    pub fn samples(&self) -> &[i16; AUDIO_BLOCK_SAMPLES] {
        &self.samples
    }

    /// Mutably borrow the samples.
    pub fn samples_mut(&mut self) -> &mut [i16; AUDIO_BLOCK_SAMPLES] {
        &mut self.samples
    }

    /// Overwrite the block with silence.
    pub fn fill_silence(&mut self) {
        self.samples.fill(0);
    }
}

impl Default for AudioBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Destination for audio blocks, driven once per tick.
///
/// # Backpressure
///
/// [`allocate`](BlockSink::allocate) returning `None` means the pipeline is
/// saturated. Callers must treat this as "skip this tick", not as an error.
pub trait BlockSink: Send + Sync {
    /// Obtain an empty block, or `None` if the pipeline cannot accept one.
    fn allocate(&self) -> Option<AudioBlock>;

    /// Deliver a filled block downstream.
    fn transmit(&self, block: &AudioBlock);

    /// Return ownership of a block obtained from [`allocate`](BlockSink::allocate).
    fn release(&self, block: AudioBlock);
}
