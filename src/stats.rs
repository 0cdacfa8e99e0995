use crate::result::DetectionResult;
use serde::{Deserialize, Serialize};

/// Summary of a detector's result history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionStats {
    pub total_checks: usize,
    pub positive_detections: usize,
    /// `positive_detections / total_checks`, 0.0 with no history.
    pub detection_rate: f64,
    /// Mean confidence over all results, abstentions included.
    pub average_confidence: f64,
    pub current_window_length: usize,
}

impl DetectionStats {
    pub fn from_history(history: &[DetectionResult], current_window_length: usize) -> Self {
        let total_checks = history.len();
        if total_checks == 0 {
            return Self {
                current_window_length,
                ..Self::default()
            };
        }

        let positive_detections = history.iter().filter(|r| r.detected()).count();
        let confidence_sum: f64 = history.iter().map(|r| r.confidence()).sum();

        Self {
            total_checks,
            positive_detections,
            detection_rate: positive_detections as f64 / total_checks as f64,
            average_confidence: confidence_sum / total_checks as f64,
            current_window_length,
        }
    }
}
