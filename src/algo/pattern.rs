use crate::config::DetectionStrategy;
use crate::result::{AbstainReason, DetectionResult, Metadata, Trend};
use crate::window::SlidingWindow;
use chrono::{DateTime, Utc};

/// Fires when the entire window is strictly monotonic. Binary confidence.
pub fn evaluate(window: &SlidingWindow, timestamp: DateTime<Utc>) -> DetectionResult {
    if window.len() < DetectionStrategy::Pattern.min_samples() {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window.len(), timestamp);
    }

    let pattern = window.trend();
    let detected = pattern != Trend::None;

    DetectionResult::new(
        detected,
        if detected { 1.0 } else { 0.0 },
        timestamp,
        Metadata::Pattern {
            pattern,
            window_len: window.len(),
        },
    )
}
