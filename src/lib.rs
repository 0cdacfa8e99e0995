//! Streaming scalar detection.
//!
//! Feed a [`Detector`] one measurement at a time (a frame's object count, a
//! latency sample, a queue depth...) and it classifies the stream with one of
//! four strategies: threshold crossing, monotonic pattern, statistical
//! anomaly, or relative change. Every call yields a confidence-scored
//! [`DetectionResult`]; positive results can trigger a registered
//! [`Reaction`].

pub mod algo;
pub mod config;
pub mod detector;
pub mod error;
pub mod reaction;
pub mod result;
pub mod stats;
pub mod window;

pub use config::{DetectionStrategy, DetectorConfig};
pub use detector::Detector;
pub use error::{ConfigError, DetectorError};
pub use reaction::{FnReaction, LogReaction, Reaction, ReactionError, reaction_fn};
pub use result::{AbstainReason, DetectionResult, Metadata, Trend};
pub use stats::DetectionStats;
pub use window::SlidingWindow;
