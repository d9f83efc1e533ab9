//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the streaming core:
//! - Logging and tracing infrastructure
//! - Capability configuration with fail-fast validation
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the playback crate depends
//! on. It establishes the logging conventions and the way capabilities are
//! injected into a player.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
