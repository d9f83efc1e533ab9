//! # Core Configuration Module
//!
//! Holds the capabilities the streaming core is wired to.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every bridge the player calls through. It enforces
//! fail-fast validation so that a missing capability is reported when the
//! host starts up, not on the first tick.
//!
//! ## Required Dependencies
//!
//! - `BlockSink` - The audio pipeline that receives blocks
//! - `SourceOpener` - Required unless the `desktop-shims` feature supplies one
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `BusArbiter` - Defaults to [`UncontendedBus`]
//! - `Clock` - Defaults to [`SystemClock`]
//!
//! When the `desktop-shims` feature is enabled, a filesystem-backed
//! `SourceOpener` rooted at [`media_root`](CoreConfigBuilder::media_root) (or
//! the platform audio directory) is injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .media_root("/media/sd")
//!     .block_sink(Arc::new(MySink::default()))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder provides actionable error messages when capabilities are
//! missing:
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! // Fails: no BlockSink was injected
//! let err = CoreConfig::builder().build().unwrap_err();
//! ```

use crate::error::{Error, Result};
use bridge_traits::{BlockSink, BusArbiter, Clock, SourceOpener, SystemClock, UncontendedBus};
use std::path::PathBuf;
use std::sync::Arc;

/// Capabilities for one streaming player.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Resolves source names into open handles
    pub source_opener: Arc<dyn SourceOpener>,

    /// Arbitration for the bus shared with the storage device
    pub bus_arbiter: Arc<dyn BusArbiter>,

    /// Audio pipeline receiving one block per tick
    pub block_sink: Arc<dyn BlockSink>,

    /// Time source for idle-duration tracking
    pub clock: Arc<dyn Clock>,

    /// Directory that source names are resolved against, when known
    pub media_root: Option<PathBuf>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("source_opener", &"SourceOpener { ... }")
            .field("bus_arbiter", &"BusArbiter { ... }")
            .field("block_sink", &"BlockSink { ... }")
            .field("clock", &"Clock { ... }")
            .field("media_root", &self.media_root)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.media_root {
            if root.as_os_str().is_empty() {
                return Err(Error::Config("Media root cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

fn block_sink_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "BlockSink".to_string(),
        message: "BlockSink implementation is required to deliver audio blocks. \
                 Desktop: use core_playback::RingBufferSink. \
                 Embedded: wrap the audio pipeline's block allocator."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn source_opener_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SourceOpener".to_string(),
        message: "SourceOpener implementation is required to open audio sources. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default FsSourceOpener. \
                 Embedded: inject an adapter over the card's file API."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_source_opener(media_root: Option<&PathBuf>) -> Result<Arc<dyn SourceOpener>> {
    use bridge_desktop::FsSourceOpener;

    let opener = match media_root {
        Some(root) => FsSourceOpener::with_root(root.clone()),
        None => FsSourceOpener::new(),
    };
    let opener: Arc<dyn SourceOpener> = Arc::new(opener);
    Ok(opener)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_source_opener(_media_root: Option<&PathBuf>) -> Result<Arc<dyn SourceOpener>> {
    Err(source_opener_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    source_opener: Option<Arc<dyn SourceOpener>>,
    bus_arbiter: Option<Arc<dyn BusArbiter>>,
    block_sink: Option<Arc<dyn BlockSink>>,
    clock: Option<Arc<dyn Clock>>,
    media_root: Option<PathBuf>,
}

impl CoreConfigBuilder {
    /// Sets the directory source names are resolved against.
    ///
    /// Only used by the default desktop `SourceOpener`.
    pub fn media_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.media_root = Some(path.into());
        self
    }

    /// Sets the source opener implementation.
    pub fn source_opener(mut self, opener: Arc<dyn SourceOpener>) -> Self {
        self.source_opener = Some(opener);
        self
    }

    /// Sets the bus arbiter implementation.
    ///
    /// Default: [`UncontendedBus`].
    pub fn bus_arbiter(mut self, bus: Arc<dyn BusArbiter>) -> Self {
        self.bus_arbiter = Some(bus);
        self
    }

    /// Sets the audio block sink (required).
    pub fn block_sink(mut self, sink: Arc<dyn BlockSink>) -> Self {
        self.block_sink = Some(sink);
        self
    }

    /// Sets the clock implementation.
    ///
    /// Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the [`CoreConfig`], validating required capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] if no `BlockSink` was provided, or
    /// no `SourceOpener` was provided and `desktop-shims` is disabled.
    pub fn build(self) -> Result<CoreConfig> {
        let block_sink = self.block_sink.ok_or_else(block_sink_missing_error)?;

        let source_opener = match self.source_opener {
            Some(opener) => opener,
            None => provide_default_source_opener(self.media_root.as_ref())?,
        };

        let config = CoreConfig {
            source_opener,
            bus_arbiter: self
                .bus_arbiter
                .unwrap_or_else(|| Arc::new(UncontendedBus)),
            block_sink,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            media_root: self.media_root,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{AudioBlock, BridgeError, SourceHandle};

    struct NullSink;

    impl BlockSink for NullSink {
        fn allocate(&self) -> Option<AudioBlock> {
            None
        }

        fn transmit(&self, _block: &AudioBlock) {}

        fn release(&self, _block: AudioBlock) {}
    }

    struct NullOpener;

    impl SourceOpener for NullOpener {
        fn open(&self, name: &str) -> BridgeResult<Box<dyn SourceHandle>> {
            Err(BridgeError::NotAvailable(name.to_string()))
        }
    }

    #[test]
    fn test_missing_block_sink() {
        let result = CoreConfig::builder()
            .source_opener(Arc::new(NullOpener))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "BlockSink");
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_build_with_explicit_capabilities() {
        let config = CoreConfig::builder()
            .source_opener(Arc::new(NullOpener))
            .block_sink(Arc::new(NullSink))
            .build()
            .unwrap();

        assert!(config.media_root.is_none());
        assert!(config.source_opener.open("missing.raw").is_err());
        assert!(config.block_sink.allocate().is_none());
        assert!(config.clock.unix_timestamp_millis() > 0);
    }

    #[test]
    fn test_empty_media_root_rejected() {
        let result = CoreConfig::builder()
            .source_opener(Arc::new(NullOpener))
            .block_sink(Arc::new(NullSink))
            .media_root("")
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_source_opener_without_shims() {
        let result = CoreConfig::builder().block_sink(Arc::new(NullSink)).build();

        match result {
            Err(Error::CapabilityMissing { capability, message }) => {
                assert_eq!(capability, "SourceOpener");
                assert!(message.contains("desktop-shims"));
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_default_source_opener_with_shims() {
        let root = std::env::temp_dir().join(format!("core-runtime-config-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("click.raw"), [0u8; 4]).unwrap();

        let config = CoreConfig::builder()
            .block_sink(Arc::new(NullSink))
            .media_root(&root)
            .build()
            .unwrap();

        let source = config.source_opener.open("click.raw").unwrap();
        assert_eq!(source.size(), 4);
        source.close();

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_debug_hides_capabilities() {
        let config = CoreConfig::builder()
            .source_opener(Arc::new(NullOpener))
            .block_sink(Arc::new(NullSink))
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("BlockSink { ... }"));
        assert!(debug.contains("media_root"));
    }
}
