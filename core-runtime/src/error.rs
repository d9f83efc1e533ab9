//! Runtime errors raised while wiring a player together.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is invalid, or logging could not be set up.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required bridge implementation was not injected.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
