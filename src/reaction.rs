//! Side-effecting handler fired on positive detections.
//!
//! The detector calls the reaction synchronously, after the result has been
//! recorded, and does not isolate it: a returned error is handed straight
//! back to the `ingest` caller and nothing is retried.

use crate::result::DetectionResult;
use std::error::Error as StdError;
use std::fmt;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure raised by a [`Reaction`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ReactionError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ReactionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub trait Reaction: Send {
    /// Inspect a positive result. Only called when `result.detected()` is true.
    fn react(&mut self, result: &DetectionResult) -> Result<(), ReactionError>;
}

/// Adapter turning a closure into a [`Reaction`].
pub struct FnReaction<F>(F);

impl<F> Reaction for FnReaction<F>
where
    F: FnMut(&DetectionResult) -> Result<(), ReactionError> + Send,
{
    fn react(&mut self, result: &DetectionResult) -> Result<(), ReactionError> {
        (self.0)(result)
    }
}

impl<F> fmt::Debug for FnReaction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnReaction")
    }
}

pub fn reaction_fn<F>(f: F) -> FnReaction<F>
where
    F: FnMut(&DetectionResult) -> Result<(), ReactionError> + Send,
{
    FnReaction(f)
}

/// Emits a `tracing` event for every positive detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReaction;

impl Reaction for LogReaction {
    fn react(&mut self, result: &DetectionResult) -> Result<(), ReactionError> {
        tracing::info!(
            confidence = result.confidence(),
            timestamp = %result.timestamp(),
            metadata = ?result.metadata(),
            "Detection fired."
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Metadata, Trend};
    use chrono::Utc;

    fn positive() -> DetectionResult {
        DetectionResult::new(
            true,
            1.0,
            Utc::now(),
            Metadata::Pattern {
                pattern: Trend::Increasing,
                window_len: 3,
            },
        )
    }

    #[test]
    fn test_closure_reaction_sees_result() {
        let mut seen = Vec::new();
        {
            let mut reaction = reaction_fn(|r: &DetectionResult| {
                seen.push(r.confidence());
                Ok(())
            });
            reaction.react(&positive()).unwrap();
        }
        assert_eq!(seen, vec![1.0]);
    }

    #[test]
    fn test_reaction_error_keeps_source() {
        let io = std::io::Error::other("sink closed");
        let err = ReactionError::with_source("alert sink unavailable", io);
        assert_eq!(err.to_string(), "alert sink unavailable");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_log_reaction_never_fails() {
        assert!(LogReaction.react(&positive()).is_ok());
    }
}
