//! Deviation-from-mean detector over the current window.
//!
//! The latest sample is compared with the population mean of the window
//! (which includes that sample). It is anomalous when it lies further than
//! `sensitivity` standard deviations away.
//!
//! Confidence is `deviation / max(boundary, 1.0)`. The 1.0 floor keeps small
//! positive boundaries from inflating confidence; it reduces sensitivity at
//! low variance and is kept as-is. A zero boundary (flat window or zero
//! sensitivity) reports 0.0 confidence.

use crate::config::DetectionStrategy;
use crate::result::{AbstainReason, DetectionResult, Metadata};
use crate::window::SlidingWindow;
use chrono::{DateTime, Utc};

pub fn evaluate(
    window: &SlidingWindow,
    sensitivity: f64,
    timestamp: DateTime<Utc>,
) -> DetectionResult {
    let window_len = window.len();
    if window_len < DetectionStrategy::Anomaly.min_samples() {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window_len, timestamp);
    }
    let (Some((mean, std_dev)), Some(value)) = (window.population_std_dev(), window.latest())
    else {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window_len, timestamp);
    };

    let deviation = (value - mean).abs();
    let boundary = sensitivity * std_dev;
    let detected = deviation > boundary;

    // Overflowing windows yield NaN or inf/inf here; neither carries a score.
    let ratio = deviation / boundary.max(1.0);
    let confidence = if boundary == 0.0 || boundary.is_nan() || ratio.is_nan() {
        0.0
    } else {
        ratio.min(1.0)
    };

    DetectionResult::new(
        detected,
        confidence,
        timestamp,
        Metadata::Anomaly {
            value,
            mean,
            std_dev,
            deviation,
        },
    )
}
