//! # Ring Buffer for PCM Audio Samples
//!
//! A fixed-capacity circular buffer of 16-bit samples sitting between the
//! tick callback (producer) and whatever drains the pipeline (consumer).
//!
//! ## Design
//!
//! - **Capacity**: Fixed size determined at creation, allocated once
//! - **Overflow Policy**: Writes never overwrite unread samples; excess input
//!   is refused and the short count returned
//! - **Sharing**: Clones share the same storage
//!
//! ## Usage
//!
//! ```rust
//! use core_playback::ring_buffer::RingBuffer;
//!
//! let buffer = RingBuffer::new(1024);
//!
//! // Producer: Write samples
//! buffer.write(&[100, -100, 200, -200]);
//!
//! // Consumer: Read samples
//! let mut output = vec![0i16; 1024];
//! let read = buffer.read(&mut output);
//! assert_eq!(read, 4);
//! ```

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone)]
pub struct RingBuffer {
    inner: Arc<Mutex<RingState>>,
    capacity: usize,
}

struct RingState {
    samples: Vec<i16>,
    read_pos: usize,
    len: usize,
}

impl RingBuffer {
    /// Create a new ring buffer holding up to `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RingState {
                samples: vec![0; capacity],
                read_pos: 0,
                len: 0,
            })),
            capacity,
        }
    }

    /// Write samples to the ring buffer.
    ///
    /// Returns the number of samples actually written, which is less than
    /// `samples.len()` when the buffer fills up.
    pub fn write(&self, samples: &[i16]) -> usize {
        let mut state = self.inner.lock();
        let to_write = samples.len().min(self.capacity - state.len);

        let write_pos = (state.read_pos + state.len) % self.capacity.max(1);
        for (i, &sample) in samples[..to_write].iter().enumerate() {
            let pos = (write_pos + i) % self.capacity;
            state.samples[pos] = sample;
        }
        state.len += to_write;

        to_write
    }

    /// Read samples from the ring buffer.
    ///
    /// Fills `output` with as many samples as available, up to `output.len()`.
    /// Returns the number of samples actually read.
    pub fn read(&self, output: &mut [i16]) -> usize {
        let mut state = self.inner.lock();
        let to_read = state.len.min(output.len());

        for (i, slot) in output[..to_read].iter_mut().enumerate() {
            *slot = state.samples[(state.read_pos + i) % self.capacity];
        }
        if to_read > 0 {
            state.read_pos = (state.read_pos + to_read) % self.capacity;
            state.len -= to_read;
        }

        to_read
    }

    /// Returns the number of samples currently available to read.
    pub fn available(&self) -> usize {
        self.inner.lock().len
    }

    /// Returns the number of samples that can be written without refusal.
    pub fn free_space(&self) -> usize {
        self.capacity - self.available()
    }

    /// Returns the total capacity of the buffer in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the buffer fill percentage (0.0 to 1.0).
    pub fn fill_level(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.available() as f32 / self.capacity as f32
    }

    /// Discard all unread samples.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.read_pos = 0;
        state.len = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    pub fn is_full(&self) -> bool {
        self.available() == self.capacity
    }
}
