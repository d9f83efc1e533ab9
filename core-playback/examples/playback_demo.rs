//! # Stream Player Demo
//!
//! Writes a short raw PCM tone to a temporary media directory, preloads it
//! with keep-preload, streams it through a ring sink at audio cadence, then
//! replays it without reopening the file.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_desktop::{FsSourceOpener, SharedBusArbiter};
use bridge_traits::AUDIO_BLOCK_SAMPLES;
use core_playback::{PlayerConfig, RingBufferSink, StreamPlayer, TickScheduler};
use core_runtime::config::CoreConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;
use std::time::Duration;

/// Render `duration_secs` of a sine tone as raw little-endian 16-bit mono.
fn render_tone(sample_rate: f64, duration_secs: f64, frequency: f64) -> Vec<u8> {
    let total = (sample_rate * duration_secs) as usize;
    (0..total)
        .map(|i| {
            let t = i as f64 / sample_rate;
            ((2.0 * std::f64::consts::PI * frequency * t).sin() * 0.3 * i16::MAX as f64) as i16
        })
        .flat_map(i16::to_le_bytes)
        .collect()
}

/// Drain whatever the player has delivered so far, returning peak amplitude.
fn drain_peak(sink: &RingBufferSink) -> (usize, i16) {
    let reader = sink.reader();
    let mut block = [0i16; AUDIO_BLOCK_SAMPLES];
    let mut samples = 0;
    let mut peak = 0i16;
    loop {
        let n = reader.read(&mut block);
        if n == 0 {
            break;
        }
        samples += n;
        peak = block[..n].iter().fold(peak, |p, s| p.max(s.saturating_abs()));
    }
    (samples, peak)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    println!("🎵 Core Playback - Stream Player Demo\n");

    let config = PlayerConfig::default();
    let media_root = std::env::temp_dir().join("core-playback-demo");
    std::fs::create_dir_all(&media_root)?;
    std::fs::write(
        media_root.join("tone.raw"),
        render_tone(config.sample_rate, 0.25, 440.0),
    )?;

    let sink = Arc::new(RingBufferSink::new(512));
    let bus = Arc::new(SharedBusArbiter::new("sdio"));
    let core = CoreConfig::builder()
        .source_opener(Arc::new(FsSourceOpener::with_root(&media_root)))
        .bus_arbiter(bus.clone())
        .block_sink(sink.clone())
        .build()?;

    let player = Arc::new(StreamPlayer::new(&core, config.clone())?);

    println!("📂 Preloading tone.raw (keep-preload)...");
    player.preload("tone.raw", true)?;
    println!("   Length: {} ms", player.length_millis());
    println!("   Bus in use: {}\n", bus.is_in_use());

    let scheduler = TickScheduler::new(player.clone(), &config);
    let cancel = scheduler.cancellation_token();
    let ticks = scheduler.spawn();

    for pass in 1..=2 {
        println!("▶️  Pass {}", pass);
        player.play(false)?;
        while player.is_playing() {
            tokio::time::sleep(Duration::from_millis(20)).await;
            println!("   Position: {} ms", player.position_millis());
        }

        let (samples, peak) = drain_peak(&sink);
        println!("   Delivered {} samples, peak {}", samples, peak);
        println!("   State after end of stream: {:?}\n", player.state());
    }

    player.stop();
    cancel.cancel();
    let ticks = ticks.await.unwrap_or_default();

    let stats = player.stats();
    println!("📊 Stats");
    println!("   Ticks: {}", ticks);
    println!("   Blocks delivered: {}", stats.blocks_delivered);
    println!("   Primed ratio: {:.2}", stats.primed_ratio());
    println!("   Saturated ticks: {}", stats.sink_saturated_ticks);

    drop(player);
    println!("   Bus in use after drop: {}", bus.is_in_use());

    let _ = std::fs::remove_dir_all(&media_root);
    println!("\n🎉 Demo completed successfully!");

    Ok(())
}
