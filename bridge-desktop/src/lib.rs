//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `SourceOpener` / `SourceHandle` using `std::fs`, rooted at a media directory
//! - `BusArbiter` as a reference-counted holder count
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FsSourceOpener, SharedBusArbiter};
//! use std::sync::Arc;
//!
//! let opener = Arc::new(FsSourceOpener::with_root("/media/sd"));
//! let bus = Arc::new(SharedBusArbiter::new("sd-spi"));
//! // Hand both to core_runtime::config::CoreConfig::builder()
//! ```

mod bus;
mod filesystem;

pub use bus::SharedBusArbiter;
pub use filesystem::{FsSourceHandle, FsSourceOpener};
