//! Workspace facade crate.
//!
//! Re-exports the streaming player and its runtime so host applications can
//! depend on `rawstream-workspace` and enable the documented features without
//! wiring each crate individually.

pub use core_playback as playback;
pub use core_runtime as runtime;

pub use core_playback::{PlaybackError, PlayerConfig, StreamPlayer};
pub use core_runtime::config::CoreConfig;
