//! # Stream Player
//!
//! Streams a raw 16-bit PCM source into a [`BlockSink`], one block per tick.
//!
//! ## Overview
//!
//! [`StreamPlayer`] has two callers:
//! - The control path (`preload`, `play`, `stop`), called from ordinary code
//! - The tick callback ([`update`](StreamPlayer::update)), called once per
//!   audio quantum by the pipeline scheduler
//!
//! Each storage read fetches two blocks. The first is delivered immediately
//! and the second is kept in a priming buffer for the next tick, so a slow
//! read is paid for once every two ticks.
//!
//! ## Locking
//!
//! Player state sits behind a single mutex. The control path locks it; the
//! tick only ever `try_lock`s and skips the quantum if a control call is in
//! progress. Flags and counters that callers poll are mirrored in atomics so
//! queries never contend with the tick.
//!
//! ## Keep-preload
//!
//! A source preloaded with `keep_preload` is rewound in place on stop or end
//! of stream instead of being closed, and can be replayed with
//! [`play`](StreamPlayer::play) without reopening it. Opening another source
//! always fully closes the kept one first.

use crate::config::{PlayerConfig, PlayerState, PlayerStats};
use crate::error::{PlaybackError, Result};
use crate::timing::ByteTiming;
use bridge_traits::{
    AudioBlock, BlockSink, BusArbiter, Clock, SourceHandle, SourceOpener, AUDIO_BLOCK_BYTES,
    AUDIO_BLOCK_SAMPLES,
};
use core_runtime::config::CoreConfig;
use core_runtime::logging::strip_path;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Bytes requested from the source per read: one block to deliver, one to prime.
const READ_CHUNK_BYTES: usize = AUDIO_BLOCK_BYTES * 2;

type BlockSamples = [i16; AUDIO_BLOCK_SAMPLES];

struct PlayerInner {
    source: Option<Box<dyn SourceHandle>>,
    source_name: String,
    keep_preload: bool,
    looping: bool,
    primed: Option<BlockSamples>,
    scratch: [u8; READ_CHUNK_BYTES],
    stats: PlayerStats,
}

/// Fixed-latency player for a single raw PCM source.
pub struct StreamPlayer {
    inner: Mutex<PlayerInner>,
    opener: Arc<dyn SourceOpener>,
    bus: Arc<dyn BusArbiter>,
    sink: Arc<dyn BlockSink>,
    clock: Arc<dyn Clock>,
    timing: ByteTiming,
    playing: AtomicBool,
    source_open: AtomicBool,
    read_offset: AtomicU64,
    source_size: AtomicU64,
    stopped_at_ms: AtomicI64,
}

impl StreamPlayer {
    /// Create a player wired to the capabilities in `core`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidConfig`] if `config` fails validation.
    pub fn new(core: &CoreConfig, config: PlayerConfig) -> Result<Self> {
        config.validate().map_err(PlaybackError::InvalidConfig)?;
        core.validate()?;

        debug!(sample_rate = config.sample_rate, "Creating stream player");

        Ok(Self {
            inner: Mutex::new(PlayerInner {
                source: None,
                source_name: String::new(),
                keep_preload: false,
                looping: false,
                primed: None,
                scratch: [0; READ_CHUNK_BYTES],
                stats: PlayerStats::default(),
            }),
            opener: Arc::clone(&core.source_opener),
            bus: Arc::clone(&core.bus_arbiter),
            sink: Arc::clone(&core.block_sink),
            clock: Arc::clone(&core.clock),
            timing: ByteTiming::new(config.sample_rate),
            playing: AtomicBool::new(false),
            source_open: AtomicBool::new(false),
            read_offset: AtomicU64::new(0),
            source_size: AtomicU64::new(0),
            stopped_at_ms: AtomicI64::new(core.clock.unix_timestamp_millis()),
        })
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    /// Open `name` and prime it without starting playback.
    ///
    /// Any current source is stopped and fully closed first, whatever its
    /// keep-preload setting. On failure the player is left closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::SourceError`] if the source cannot be opened.
    #[instrument(skip(self, name), fields(source = %strip_path(name)))]
    pub fn preload(&self, name: &str, keep_preload: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        self.preload_locked(&mut inner, name, keep_preload)
    }

    /// Open `name` and start playing it immediately.
    ///
    /// The source is never kept open after it stops.
    #[instrument(skip(self, name), fields(source = %strip_path(name)))]
    pub fn play_file(&self, name: &str, looping: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        self.preload_locked(&mut inner, name, false)?;
        self.start_locked(&mut inner, looping)
    }

    /// Start playing the source that is already open.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NoTrackLoaded`] if nothing is open. State is
    /// unchanged in that case.
    #[instrument(skip(self))]
    pub fn play(&self, looping: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        self.start_locked(&mut inner, looping)
    }

    /// Stop playback.
    ///
    /// Does nothing unless playing. Once this returns, no tick will deliver
    /// another block from the stopped source.
    #[instrument(skip(self))]
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if !self.playing.swap(false, Ordering::AcqRel) {
            return;
        }
        self.mark_stopped();
        self.finish_source(&mut inner);
        info!("Playback stopped");
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Deliver at most one block to the sink.
    ///
    /// Called once per audio quantum. Never waits on the control path and
    /// never allocates; a tick that cannot make progress is simply skipped.
    pub fn update(&self) {
        if !self.playing.load(Ordering::Acquire) {
            return;
        }

        let Some(mut inner) = self.inner.try_lock() else {
            return;
        };
        if !self.playing.load(Ordering::Acquire) {
            return;
        }

        let Some(mut block) = self.sink.allocate() else {
            inner.stats.sink_saturated_ticks += 1;
            return;
        };

        if self.fill_block(&mut inner, &mut block) {
            self.sink.transmit(&block);
            inner.stats.blocks_delivered += 1;
        }
        self.sink.release(block);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_playing()
    }

    /// Time since playback last stopped, or since the last preload.
    ///
    /// Zero while playing.
    pub fn time_since_stopped(&self) -> Duration {
        if self.is_playing() {
            return Duration::ZERO;
        }
        let stopped_at = self.stopped_at_ms.load(Ordering::Acquire);
        let elapsed = self.clock.unix_timestamp_millis() - stopped_at;
        Duration::from_millis(elapsed.max(0) as u64)
    }

    /// Returns `true` if stopped for strictly longer than `idle`.
    pub fn stopped_for_at_least(&self, idle: Duration) -> bool {
        self.is_stopped() && self.time_since_stopped() > idle
    }

    /// Playback position in milliseconds, measured by bytes read.
    ///
    /// Includes the primed block, so it runs up to one block ahead of what
    /// has been delivered. Zero when no source is open.
    pub fn position_millis(&self) -> u32 {
        self.timing.millis(self.read_offset())
    }

    /// Length of the current source in milliseconds, zero if none.
    pub fn length_millis(&self) -> u32 {
        self.timing.millis(self.source_size())
    }

    /// Bytes read from the current source.
    pub fn read_offset(&self) -> u64 {
        self.read_offset.load(Ordering::Acquire)
    }

    /// Size of the current source in bytes as of open time, zero if none.
    pub fn source_size(&self) -> u64 {
        self.source_size.load(Ordering::Acquire)
    }

    pub fn state(&self) -> PlayerState {
        if self.is_playing() {
            PlayerState::Playing
        } else if self.source_open.load(Ordering::Acquire) {
            PlayerState::Preloaded
        } else {
            PlayerState::Closed
        }
    }

    pub fn is_looping(&self) -> bool {
        self.inner.lock().looping
    }

    /// Snapshot of the tick counters.
    pub fn stats(&self) -> PlayerStats {
        self.inner.lock().stats.clone()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn preload_locked(&self, inner: &mut PlayerInner, name: &str, keep_preload: bool) -> Result<()> {
        if self.playing.swap(false, Ordering::AcqRel) {
            self.mark_stopped();
        }
        self.close_source(inner);
        inner.looping = false;

        self.open_source(inner, name)?;
        inner.keep_preload = keep_preload;
        self.mark_stopped();
        Ok(())
    }

    fn start_locked(&self, inner: &mut PlayerInner, looping: bool) -> Result<()> {
        if inner.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        inner.looping = looping;
        self.playing.store(true, Ordering::Release);
        info!(looping, "Playback started");
        Ok(())
    }

    /// Acquire the bus and open `name`. The bus is released again if the
    /// open fails, so it is held exactly while a source is open.
    fn open_source(&self, inner: &mut PlayerInner, name: &str) -> Result<()> {
        self.bus.acquire();

        let source = match self.opener.open(name) {
            Ok(source) => source,
            Err(err) => {
                self.bus.release();
                warn!(error = %err, "Failed to open source");
                return Err(PlaybackError::SourceError {
                    name: name.to_string(),
                    source: err,
                });
            }
        };

        let size = source.size();
        inner.source = Some(source);
        inner.source_name = name.to_string();
        inner.primed = None;
        self.read_offset.store(0, Ordering::Release);
        self.source_size.store(size, Ordering::Release);
        self.source_open.store(true, Ordering::Release);

        info!(bytes = size, length_ms = self.timing.millis(size), "Source opened");
        Ok(())
    }

    /// Release the source and the bus unconditionally. Size and offset read
    /// as zero until the next open.
    fn close_source(&self, inner: &mut PlayerInner) {
        inner.keep_preload = false;
        inner.primed = None;

        if let Some(source) = inner.source.take() {
            source.close();
            self.source_open.store(false, Ordering::Release);
            self.source_size.store(0, Ordering::Release);
            self.read_offset.store(0, Ordering::Release);
            self.bus.release();
            info!(source = %strip_path(&inner.source_name), "Source closed");
            inner.source_name.clear();
        }
    }

    /// Close after a stop or end of stream, honoring keep-preload.
    fn finish_source(&self, inner: &mut PlayerInner) {
        if inner.keep_preload {
            if let Some(source) = inner.source.as_mut() {
                match source.seek(0) {
                    Ok(()) => {
                        inner.primed = None;
                        self.read_offset.store(0, Ordering::Release);
                        debug!("Source rewound for replay");
                        return;
                    }
                    Err(err) => warn!(error = %err, "Rewind failed, closing source"),
                }
            }
        }
        self.close_source(inner);
    }

    /// Fill `block` from the priming buffer or a fresh read.
    ///
    /// A read that reaches past the first block primes the second one even
    /// when it is only partly filled; the remainder is zero-padded. A short
    /// final read therefore yields its tail on the next tick instead of
    /// dropping it.
    ///
    /// Returns `false` when the source is exhausted; playback has been ended
    /// and the block must not be delivered.
    fn fill_block(&self, inner: &mut PlayerInner, block: &mut AudioBlock) -> bool {
        if let Some(primed) = inner.primed.take() {
            block.samples_mut().copy_from_slice(&primed);
            inner.stats.primed_blocks += 1;
            return true;
        }

        let mut read = self.read_chunk(inner);
        if read == 0 && inner.looping && self.rewind_for_loop(inner) {
            read = self.read_chunk(inner);
        }
        if read == 0 {
            self.end_of_stream(inner);
            return false;
        }

        let (first, second) = inner.scratch.split_at(AUDIO_BLOCK_BYTES);
        decode_samples(first, block.samples_mut());
        if read > AUDIO_BLOCK_BYTES {
            let mut primed = [0; AUDIO_BLOCK_SAMPLES];
            decode_samples(second, &mut primed);
            inner.primed = Some(primed);
        }
        true
    }

    /// Read up to two blocks into the scratch buffer, zero-padding the tail.
    fn read_chunk(&self, inner: &mut PlayerInner) -> usize {
        let Some(source) = inner.source.as_mut() else {
            return 0;
        };
        if !source.available() {
            return 0;
        }

        let read = match source.read(&mut inner.scratch) {
            Ok(n) => n.min(READ_CHUNK_BYTES),
            Err(err) => {
                warn!(error = %err, "Source read failed");
                0
            }
        };
        inner.scratch[read..].fill(0);

        let offset = self.read_offset.load(Ordering::Acquire) + read as u64;
        self.read_offset
            .store(offset.min(self.source_size()), Ordering::Release);
        read
    }

    fn rewind_for_loop(&self, inner: &mut PlayerInner) -> bool {
        let Some(source) = inner.source.as_mut() else {
            return false;
        };
        match source.seek(0) {
            Ok(()) => {
                self.read_offset.store(0, Ordering::Release);
                inner.stats.loop_restarts += 1;
                debug!("Looping source from start");
                true
            }
            Err(err) => {
                warn!(error = %err, "Loop rewind failed, ending playback");
                false
            }
        }
    }

    fn end_of_stream(&self, inner: &mut PlayerInner) {
        self.playing.store(false, Ordering::Release);
        self.mark_stopped();
        inner.stats.end_of_stream += 1;
        self.finish_source(inner);
        debug!("End of stream");
    }

    fn mark_stopped(&self) {
        self.stopped_at_ms
            .store(self.clock.unix_timestamp_millis(), Ordering::Release);
    }
}

impl Drop for StreamPlayer {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        self.close_source(&mut inner);
    }
}

/// Decode little-endian 16-bit samples.
fn decode_samples(bytes: &[u8], samples: &mut BlockSamples) {
    for (sample, pair) in samples.iter_mut().zip(bytes.chunks_exact(2)) {
        *sample = i16::from_le_bytes([pair[0], pair[1]]);
    }
}
