//! # Playback Error Types
//!
//! Errors returned from the player's control surface. The tick callback has
//! no error path: every failure inside it degrades to "stop playback" or
//! "skip this tick".

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback control operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Failed to open the requested source (missing file, device error).
    #[error("Failed to open audio source {name}: {source}")]
    SourceError {
        name: String,
        #[source]
        source: BridgeError,
    },

    /// Attempted to start playback with no source open.
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Player configuration is invalid.
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    /// Error from the runtime layer (configuration, logging).
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl PlaybackError {
    /// Returns `true` if retrying the same call later may succeed.
    ///
    /// Storage can come back (card reinserted, bus freed); a source that is
    /// not playable and configuration mistakes cannot.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::SourceError {
                source: BridgeError::Io(_) | BridgeError::NotAvailable(_),
                ..
            }
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
