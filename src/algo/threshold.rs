use crate::config::DetectionStrategy;
use crate::result::{AbstainReason, DetectionResult, Metadata};
use crate::window::SlidingWindow;
use chrono::{DateTime, Utc};

/// Fires when the newest sample is at or above `threshold` (inclusive).
///
/// Confidence is the distance to the threshold relative to its magnitude,
/// capped at 1.0. A zero threshold has no scale, so confidence is 0.0.
pub fn evaluate(
    window: &SlidingWindow,
    threshold: Option<f64>,
    timestamp: DateTime<Utc>,
) -> DetectionResult {
    let window_len = window.len();
    let Some(threshold) = threshold else {
        let reason = AbstainReason::InsufficientConfiguration;
        return DetectionResult::abstain(reason, window_len, timestamp);
    };
    if window_len < DetectionStrategy::Threshold.min_samples() {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window_len, timestamp);
    }
    let Some(value) = window.latest() else {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window.len(), timestamp);
    };

    let detected = value >= threshold;
    let confidence = if threshold != 0.0 {
        ((value - threshold).abs() / threshold.abs()).min(1.0)
    } else {
        0.0
    };

    DetectionResult::new(
        detected,
        confidence,
        timestamp,
        Metadata::Threshold {
            value,
            threshold,
            window_len: window.len(),
        },
    )
}
