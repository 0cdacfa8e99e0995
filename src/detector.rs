//! Streaming detector.
//!
//! A [`Detector`] owns a bounded window of recent samples, an append-only
//! history of every result it produced, and the configuration chosen at
//! construction. Each call to [`Detector::ingest`] pushes one sample,
//! evaluates the configured strategy, records the result and, on a positive
//! verdict, fires the registered reaction.
//!
//! The detector is synchronous and not internally synchronized. Callers that
//! feed it from several producers must wrap it in their own lock.

use crate::algo::{anomaly, change, pattern, threshold};
use crate::config::{DetectionStrategy, DetectorConfig};
use crate::error::{ConfigError, DetectorError};
use crate::result::DetectionResult;
use crate::stats::DetectionStats;
use crate::window::SlidingWindow;
use chrono::Utc;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Detector {
    config: DetectorConfig,
    window: SlidingWindow,
    /// Unbounded. Long-running callers should `reset` periodically.
    history: Vec<DetectionResult>,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        if config.strategy == DetectionStrategy::Threshold && config.threshold.is_none() {
            warn!("Threshold strategy configured without a threshold; every check will abstain.");
        }
        debug!(
            strategy = %config.strategy,
            window_size = config.window_size,
            sensitivity = config.sensitivity,
            "Detector created."
        );

        Ok(Self {
            window: SlidingWindow::new(config.window_size),
            history: Vec::new(),
            config,
        })
    }

    /// Feed one sample and return the verdict for the updated window.
    ///
    /// Non-finite samples are rejected before touching any state. If the
    /// reaction fails, the error is returned but the result stays recorded.
    pub fn ingest(&mut self, value: f64) -> Result<DetectionResult, DetectorError> {
        if !value.is_finite() {
            warn!(value, "Rejected non-finite sample.");
            return Err(DetectorError::NonFiniteInput(value));
        }

        self.window.push(value);
        let result = self.evaluate();
        self.history.push(result.clone());

        debug!(
            value,
            detected = result.detected(),
            confidence = result.confidence(),
            window_len = self.window.len(),
            "Sample evaluated."
        );

        if result.detected() {
            if let Some(reaction) = self.config.reaction.as_mut() {
                info!(
                    strategy = %self.config.strategy,
                    confidence = result.confidence(),
                    "Firing reaction."
                );
                reaction.react(&result)?;
            }
        }

        Ok(result)
    }

    /// Alias of [`Detector::ingest`].
    pub fn add_data_point(&mut self, value: f64) -> Result<DetectionResult, DetectorError> {
        self.ingest(value)
    }

    /// Feed a batch, stopping at the first error.
    pub fn ingest_all<I>(&mut self, values: I) -> Result<Vec<DetectionResult>, DetectorError>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().map(|v| self.ingest(v)).collect()
    }

    fn evaluate(&self) -> DetectionResult {
        let now = Utc::now();
        let window = &self.window;
        let sensitivity = self.config.sensitivity;
        match self.config.strategy {
            DetectionStrategy::Threshold => threshold::evaluate(window, self.config.threshold, now),
            DetectionStrategy::Pattern => pattern::evaluate(window, now),
            DetectionStrategy::Anomaly => anomaly::evaluate(window, sensitivity, now),
            DetectionStrategy::Change => change::evaluate(window, sensitivity, now),
        }
    }

    /// Clear window and history. Configuration is kept.
    pub fn reset(&mut self) {
        debug!(
            cleared_results = self.history.len(),
            cleared_samples = self.window.len(),
            "Detector reset."
        );
        self.window.clear();
        self.history.clear();
    }

    pub fn statistics(&self) -> DetectionStats {
        DetectionStats::from_history(&self.history, self.window.len())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn strategy(&self) -> DetectionStrategy {
        self.config.strategy
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn history(&self) -> &[DetectionResult] {
        &self.history
    }

    pub fn last_result(&self) -> Option<&DetectionResult> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::{ReactionError, reaction_fn};
    use crate::result::{AbstainReason, Trend};
    use std::sync::{Arc, Mutex};

    fn detector(config: DetectorConfig) -> Detector {
        Detector::new(config).unwrap()
    }

    #[test]
    fn test_threshold_sequence() {
        let mut d = detector(DetectorConfig::threshold(10.0));
        assert!(!d.ingest(5.0).unwrap().detected());
        let result = d.ingest(15.0).unwrap();
        assert!(result.detected());
        assert!(result.confidence() > 0.0);
        assert!(d.ingest(10.0).unwrap().detected(), "boundary is inclusive");
    }

    #[test]
    fn test_negative_threshold() {
        let mut d = detector(DetectorConfig::threshold(-10.0));
        let result = d.ingest(-5.0).unwrap();
        assert!(result.detected());
        assert!((0.0..=1.0).contains(&result.confidence()));
        assert!(!d.ingest(-15.0).unwrap().detected());
    }

    #[test]
    fn test_threshold_without_value_abstains() {
        let mut d = detector(DetectorConfig::new(DetectionStrategy::Threshold));
        let result = d.ingest(1_000.0).unwrap();
        assert!(!result.detected());
        assert_eq!(result.confidence(), 0.0);
        assert_eq!(
            result.metadata().abstain_reason(),
            Some(AbstainReason::InsufficientConfiguration)
        );
    }

    #[test]
    fn test_window_keeps_latest_values() {
        let mut d = detector(DetectorConfig::threshold(10.0).with_window_size(3));
        for i in 0..5 {
            d.ingest(i as f64).unwrap();
        }
        assert_eq!(d.window().to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(d.history().len(), 5);
    }

    #[test]
    fn test_pattern_warmup_then_detects() {
        let mut d = detector(DetectorConfig::new(DetectionStrategy::Pattern).with_window_size(5));
        let results = d.ingest_all([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(results[0].is_abstention());
        assert!(results[1].is_abstention());
        assert!(results[2..].iter().all(|r| r.detected()));
        assert_eq!(results[4].metadata().pattern(), Some(Trend::Increasing));
    }

    #[test]
    fn test_pattern_evicted_values_do_not_count() {
        let mut d = detector(DetectorConfig::new(DetectionStrategy::Pattern).with_window_size(3));
        d.ingest_all([9.0, 1.0, 2.0]).unwrap();
        let result = d.ingest(3.0).unwrap();
        assert!(result.detected(), "9.0 was evicted, window is [1, 2, 3]");
    }

    #[test]
    fn test_reaction_fires_once_per_detection() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let record = reaction_fn(move |r: &DetectionResult| {
            sink.lock().unwrap().push(r.clone());
            Ok(())
        });
        let config = DetectorConfig::threshold(10.0).with_reaction(record);
        let mut d = detector(config);

        d.ingest(5.0).unwrap();
        d.ingest(15.0).unwrap();

        let fired = fired.lock().unwrap();
        assert_eq!(fired.len(), 1);
        assert!(fired[0].detected());
    }

    #[test]
    fn test_reaction_failure_propagates_after_recording() {
        let config = DetectorConfig::threshold(10.0)
            .with_reaction(reaction_fn(|_: &DetectionResult| {
                Err(ReactionError::new("pager down"))
            }));
        let mut d = detector(config);

        assert!(d.ingest(1.0).is_ok(), "negative verdicts never call the reaction");
        let err = d.ingest(20.0).unwrap_err();
        assert!(matches!(err, DetectorError::Reaction(ref e) if e.message() == "pager down"));
        assert_eq!(d.history().len(), 2);
        assert!(d.last_result().unwrap().detected());
    }

    #[test]
    fn test_non_finite_rejected_without_state_change() {
        let mut d = detector(DetectorConfig::new(DetectionStrategy::Anomaly));
        d.ingest(1.0).unwrap();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(d.ingest(bad), Err(DetectorError::NonFiniteInput(_))));
        }
        assert_eq!(d.window().len(), 1);
        assert_eq!(d.history().len(), 1);
    }

    #[test]
    fn test_reset_keeps_config() {
        let mut d = detector(DetectorConfig::threshold(10.0).with_window_size(4));
        d.ingest_all([5.0, 15.0, 20.0]).unwrap();
        d.reset();

        assert_eq!(d.window().len(), 0);
        assert_eq!(d.history().len(), 0);
        assert_eq!(d.config().threshold, Some(10.0));
        assert_eq!(d.config().window_size, 4);
        assert!(d.ingest(12.0).unwrap().detected());
    }

    #[test]
    fn test_statistics() {
        let mut d = detector(DetectorConfig::threshold(10.0));
        d.ingest_all([5.0, 15.0, 20.0]).unwrap();

        let stats = d.statistics();
        assert_eq!(stats.total_checks, 3);
        assert_eq!(stats.positive_detections, 2);
        assert!((stats.detection_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!(stats.average_confidence > 0.0);
        assert_eq!(stats.current_window_length, 3);
        assert_eq!(stats, d.statistics(), "statistics is a pure read");
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = DetectorConfig::new(DetectionStrategy::Pattern).with_window_size(0);
        let err = Detector::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindowSize(0)));
    }

    #[test]
    fn test_huge_window_size_builds_without_allocating() {
        let config = DetectorConfig::new(DetectionStrategy::Pattern).with_window_size(usize::MAX);
        let mut d = detector(config);
        d.ingest_all([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(d.window().capacity(), usize::MAX);
        assert!(d.last_result().unwrap().detected());
    }

    #[test]
    fn test_huge_window_size_from_json() {
        let json = format!(r#"{{ "strategy": "anomaly", "window_size": {} }}"#, usize::MAX);
        let config = DetectorConfig::from_json(&json).unwrap();
        assert!(Detector::new(config).is_ok());
    }
}
