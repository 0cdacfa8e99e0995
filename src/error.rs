//! Error taxonomy for the detector.
//!
//! Abstentions (too little data, missing threshold) are NOT errors; they are
//! reported through [`crate::result::Metadata::Abstained`]. Only construction
//! time misconfiguration and caller contract violations surface here.

use crate::reaction::ReactionError;

/// Rejected detector configuration. Raised before a detector exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown detection strategy: {0:?}")]
    UnknownStrategy(String),

    #[error("window size must be at least 1 (got {0})")]
    InvalidWindowSize(usize),

    #[error("sensitivity must be finite and non-negative (got {0})")]
    InvalidSensitivity(f64),

    #[error("threshold must be finite (got {0})")]
    InvalidThreshold(f64),

    #[error("failed to parse detector config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of a single `ingest` call.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// NaN or infinite input. The window and history are left untouched.
    #[error("non-finite input value: {0}")]
    NonFiniteInput(f64),

    /// The registered reaction failed. The result that triggered it is
    /// already part of the history.
    #[error("reaction failed: {0}")]
    Reaction(#[from] ReactionError),
}
