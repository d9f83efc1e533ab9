//! End-to-end streaming: files on disk, shared bus, ring sink and the tokio
//! tick scheduler.

use bridge_desktop::{FsSourceOpener, SharedBusArbiter};
use bridge_traits::{BridgeError, AUDIO_BLOCK_BYTES, AUDIO_BLOCK_SAMPLES};
use core_playback::{
    PlaybackError, PlayerConfig, PlayerState, RingBufferSink, StreamPlayer, TickScheduler,
};
use core_runtime::config::CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;

struct MediaDir {
    root: PathBuf,
}

impl MediaDir {
    fn new(test: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "core-playback-{}-{}",
            test,
            std::process::id()
        ));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// Write a raw file of `blocks` blocks where every sample holds its
    /// block index plus one.
    fn write_blocks(&self, name: &str, blocks: usize) {
        let bytes: Vec<u8> = (0..blocks)
            .flat_map(|block| std::iter::repeat(block as i16 + 1).take(AUDIO_BLOCK_SAMPLES))
            .flat_map(i16::to_le_bytes)
            .collect();
        std::fs::write(self.root.join(name), bytes).unwrap();
    }
}

impl Drop for MediaDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

struct Rig {
    player: Arc<StreamPlayer>,
    sink: Arc<RingBufferSink>,
    bus: Arc<SharedBusArbiter>,
    config: PlayerConfig,
}

fn rig(media: &MediaDir, sink_blocks: usize) -> Rig {
    let config = PlayerConfig {
        sink_blocks,
        ..Default::default()
    };
    let sink = Arc::new(RingBufferSink::from_config(&config));
    let bus = Arc::new(SharedBusArbiter::new("sdio"));

    let core = CoreConfig::builder()
        .source_opener(Arc::new(FsSourceOpener::with_root(&media.root)))
        .bus_arbiter(bus.clone())
        .block_sink(sink.clone())
        .build()
        .unwrap();
    let player = Arc::new(StreamPlayer::new(&core, config.clone()).unwrap());

    Rig {
        player,
        sink,
        bus,
        config,
    }
}

/// Drain the ring and return the first sample of each whole block.
fn drain_block_markers(sink: &RingBufferSink) -> Vec<i16> {
    let reader = sink.reader();
    let mut markers = Vec::new();
    let mut block = [0i16; AUDIO_BLOCK_SAMPLES];
    while reader.read(&mut block) == AUDIO_BLOCK_SAMPLES {
        assert!(block.iter().all(|&s| s == block[0]));
        markers.push(block[0]);
    }
    markers
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_streams_file_to_ring() {
    let media = MediaDir::new("stream");
    media.write_blocks("intro.raw", 10);
    let rig = rig(&media, 32);

    rig.player.preload("/intro.raw", true).unwrap();
    assert!(rig.bus.is_in_use());

    let scheduler = TickScheduler::new(rig.player.clone(), &rig.config);
    let period = scheduler.period();
    let cancel = scheduler.cancellation_token();
    let handle = scheduler.spawn();

    rig.player.play(false).unwrap();
    tokio::time::sleep(period * 40).await;

    assert!(!rig.player.is_playing());
    assert_eq!(rig.player.state(), PlayerState::Preloaded);
    assert_eq!(rig.player.length_millis(), 29);
    assert_eq!(drain_block_markers(&rig.sink), (1..=10).collect::<Vec<i16>>());

    // Kept source replays from the top
    rig.player.play(false).unwrap();
    tokio::time::sleep(period * 3).await;
    assert_eq!(drain_block_markers(&rig.sink)[..2], [1, 2]);

    cancel.cancel();
    let ticks = handle.await.unwrap();
    assert!(ticks >= 40);
    assert_eq!(rig.sink.pooled_blocks(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_saturated_ring_pauses_reading() {
    let media = MediaDir::new("saturate");
    media.write_blocks("long.raw", 10);
    let rig = rig(&media, 2);

    let scheduler = TickScheduler::new(rig.player.clone(), &rig.config);
    let period = scheduler.period();
    let cancel = scheduler.cancellation_token();
    let handle = scheduler.spawn();

    rig.player.play_file("long.raw", false).unwrap();
    tokio::time::sleep(period * 20).await;

    // Two blocks fit; the rest of the file waits on the consumer
    assert!(rig.player.is_playing());
    assert_eq!(rig.player.read_offset(), (AUDIO_BLOCK_BYTES * 2) as u64);
    assert!(rig.player.stats().sink_saturated_ticks > 0);
    assert_eq!(drain_block_markers(&rig.sink), vec![1, 2]);

    tokio::time::sleep(period * 20).await;
    assert_eq!(rig.player.read_offset(), (AUDIO_BLOCK_BYTES * 4) as u64);
    assert_eq!(drain_block_markers(&rig.sink), vec![3, 4]);

    rig.player.stop();
    assert!(!rig.bus.is_in_use());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_looping_file_keeps_streaming() {
    let media = MediaDir::new("loop");
    media.write_blocks("loop.raw", 3);
    let rig = rig(&media, 64);

    let scheduler = TickScheduler::new(rig.player.clone(), &rig.config);
    let period = scheduler.period();
    let cancel = scheduler.cancellation_token();
    let handle = scheduler.spawn();

    rig.player.play_file("loop.raw", true).unwrap();
    tokio::time::sleep(period * 30).await;

    assert!(rig.player.is_playing());
    let markers = drain_block_markers(&rig.sink);
    assert!(markers.len() >= 27);
    for (tick, marker) in markers.iter().enumerate() {
        assert_eq!(*marker, (tick % 3) as i16 + 1);
    }

    rig.player.stop();
    cancel.cancel();
    handle.await.unwrap();
    assert!(!rig.bus.is_in_use());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_scheduler_never_ticks() {
    let media = MediaDir::new("cancel");
    let rig = rig(&media, 4);

    let scheduler = TickScheduler::new(rig.player.clone(), &rig.config);
    assert_eq!(scheduler.period(), rig.config.tick_period());

    scheduler.cancellation_token().cancel();
    assert_eq!(scheduler.run().await, 0);
}

#[test]
fn test_missing_file_is_reported() {
    let media = MediaDir::new("missing");
    let rig = rig(&media, 4);

    let err = rig.player.preload("nope.raw", false).unwrap_err();
    assert!(err.to_string().contains("nope.raw"));
    assert!(matches!(
        &err,
        PlaybackError::SourceError {
            source: BridgeError::Io(io),
            ..
        } if io.kind() == std::io::ErrorKind::NotFound
    ));
    assert!(err.is_transient());
    assert_eq!(rig.player.state(), PlayerState::Closed);
    assert!(!rig.bus.is_in_use());
}
