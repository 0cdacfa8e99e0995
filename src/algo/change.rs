use crate::config::DetectionStrategy;
use crate::result::{AbstainReason, DetectionResult, Metadata};
use crate::window::SlidingWindow;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Fires when the relative change between the two newest samples exceeds
/// `sensitivity`.
///
/// With a zero previous sample the relative change is undefined, so `|curr|`
/// stands in for it. That approximation grows with the magnitude of `curr`
/// and is flagged through `zero_baseline` in the metadata.
pub fn evaluate(
    window: &SlidingWindow,
    sensitivity: f64,
    timestamp: DateTime<Utc>,
) -> DetectionResult {
    if window.len() < DetectionStrategy::Change.min_samples() {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window.len(), timestamp);
    }
    let Some((previous, current)) = window.last_two() else {
        return DetectionResult::abstain(AbstainReason::InsufficientData, window.len(), timestamp);
    };

    let zero_baseline = previous == 0.0;
    let relative_change = if zero_baseline {
        debug!(current, "Zero baseline, using absolute value as relative change.");
        current.abs()
    } else {
        ((current - previous) / previous).abs()
    };

    let detected = relative_change > sensitivity;
    let confidence = if sensitivity != 0.0 {
        (relative_change / sensitivity).min(1.0)
    } else {
        0.0
    };

    DetectionResult::new(
        detected,
        confidence,
        timestamp,
        Metadata::Change {
            previous,
            current,
            relative_change,
            zero_baseline,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(values: &[f64], sensitivity: f64) -> DetectionResult {
        let mut window = SlidingWindow::new(10);
        for v in values {
            window.push(*v);
        }
        evaluate(&window, sensitivity, Utc::now())
    }

    fn relative_change(result: &DetectionResult) -> f64 {
        match result.metadata() {
            Metadata::Change { relative_change, .. } => *relative_change,
            other => panic!("expected change metadata, got {:?}", other),
        }
    }

    #[test]
    fn test_significant_change() {
        let result = run(&[10.0, 20.0], 0.5);
        assert!(result.detected());
        assert!((relative_change(&result) - 1.0).abs() < 1e-12);
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn test_insignificant_change() {
        let result = run(&[10.0, 11.0], 0.5);
        assert!(!result.detected());
        assert!((result.confidence() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_only_latest_pair_matters() {
        let result = run(&[1.0, 100.0, 101.0], 0.5);
        assert!(!result.detected());
    }

    #[test]
    fn test_zero_baseline_uses_absolute_value() {
        let result = run(&[0.0, 1.0], 0.5);
        assert!(result.detected());
        assert_eq!(relative_change(&result), 1.0);
        assert!(matches!(
            result.metadata(),
            Metadata::Change { zero_baseline: true, .. }
        ));
    }

    #[test]
    fn test_zero_sensitivity_has_zero_confidence() {
        let result = run(&[4.0, 5.0], 0.0);
        assert!(result.detected());
        assert_eq!(result.confidence(), 0.0);
    }

    #[test]
    fn test_single_sample_abstains() {
        let result = run(&[4.0], 0.5);
        assert_eq!(result.metadata().abstain_reason(), Some(AbstainReason::InsufficientData));
    }
}
