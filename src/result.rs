//! Detection output.
//!
//! Each result carries a strategy-specific [`Metadata`] payload with a fixed
//! shape. Consumers that want a free-form view (logging, JSON sinks) can use
//! [`Metadata::to_map`], which uses the flat key names downstream tooling
//! expects (`current_value`, `buffer_size`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Why a strategy declined to produce a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstainReason {
    /// The window holds fewer samples than the strategy needs.
    InsufficientData,
    /// A parameter the strategy requires (the threshold) is not configured.
    InsufficientConfiguration,
}

impl AbstainReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::InsufficientConfiguration => "insufficient_configuration",
        }
    }
}

impl fmt::Display for AbstainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a strictly monotonic window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    None,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic payload, one variant per strategy plus the abstention case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metadata {
    Abstained {
        reason: AbstainReason,
        window_len: usize,
    },
    Threshold {
        value: f64,
        threshold: f64,
        window_len: usize,
    },
    Pattern {
        pattern: Trend,
        window_len: usize,
    },
    Anomaly {
        value: f64,
        mean: f64,
        std_dev: f64,
        deviation: f64,
    },
    Change {
        previous: f64,
        current: f64,
        relative_change: f64,
        /// `previous == 0`: `relative_change` is `|current|`, an approximation.
        zero_baseline: bool,
    },
}

impl Metadata {
    pub fn abstain_reason(&self) -> Option<AbstainReason> {
        match self {
            Self::Abstained { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<Trend> {
        match self {
            Self::Pattern { pattern, .. } => Some(*pattern),
            _ => None,
        }
    }

    /// Flat, stringly-keyed view for boundary consumers.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            Self::Abstained { reason, window_len } => {
                map.insert("reason".into(), reason.as_str().into());
                map.insert("buffer_size".into(), (*window_len).into());
            }
            Self::Threshold {
                value,
                threshold,
                window_len,
            } => {
                map.insert("current_value".into(), (*value).into());
                map.insert("threshold".into(), (*threshold).into());
                map.insert("buffer_size".into(), (*window_len).into());
            }
            Self::Pattern {
                pattern,
                window_len,
            } => {
                map.insert("pattern".into(), pattern.as_str().into());
                map.insert("buffer_size".into(), (*window_len).into());
            }
            Self::Anomaly {
                value,
                mean,
                std_dev,
                deviation,
            } => {
                map.insert("current_value".into(), (*value).into());
                map.insert("mean".into(), (*mean).into());
                map.insert("std_dev".into(), (*std_dev).into());
                map.insert("deviation".into(), (*deviation).into());
            }
            Self::Change {
                previous,
                current,
                relative_change,
                zero_baseline,
            } => {
                map.insert("previous_value".into(), (*previous).into());
                map.insert("current_value".into(), (*current).into());
                map.insert("relative_change".into(), (*relative_change).into());
                map.insert("zero_baseline".into(), (*zero_baseline).into());
            }
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }
}

/// Immutable outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    detected: bool,
    confidence: f64,
    timestamp: DateTime<Utc>,
    metadata: Metadata,
}

impl DetectionResult {
    /// `confidence` is clamped into `[0.0, 1.0]`; NaN becomes `0.0`.
    pub fn new(
        detected: bool,
        confidence: f64,
        timestamp: DateTime<Utc>,
        metadata: Metadata,
    ) -> Self {
        Self {
            detected,
            confidence: clamp_confidence(confidence),
            timestamp,
            metadata,
        }
    }

    pub fn abstain(reason: AbstainReason, window_len: usize, timestamp: DateTime<Utc>) -> Self {
        Self::new(false, 0.0, timestamp, Metadata::Abstained { reason, window_len })
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_abstention(&self) -> bool {
        matches!(self.metadata, Metadata::Abstained { .. })
    }
}

pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
