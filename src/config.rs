//! Detector configuration.
//!
//! A config selects exactly one strategy for the lifetime of a detector.
//! It can be built in code or loaded from JSON:
//!
//! ```json
//! { "strategy": "anomaly", "window_size": 10, "sensitivity": 2.0 }
//! ```
//!
//! The reaction handler is never serialized; attach it with
//! [`DetectorConfig::with_reaction`].

use crate::error::ConfigError;
use crate::reaction::Reaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DetectionStrategy {
    /// Latest value at or above a fixed threshold.
    Threshold,
    /// Whole window strictly increasing or decreasing.
    Pattern,
    /// Latest value further than `sensitivity` std-devs from the window mean.
    Anomaly,
    /// Relative change between the two latest values above `sensitivity`.
    Change,
}

impl DetectionStrategy {
    pub const ALL: [DetectionStrategy; 4] = [
        Self::Threshold,
        Self::Pattern,
        Self::Anomaly,
        Self::Change,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Pattern => "pattern",
            Self::Anomaly => "anomaly",
            Self::Change => "change",
        }
    }

    /// Smallest window length that can produce a verdict.
    pub fn min_samples(&self) -> usize {
        match self {
            Self::Threshold => 1,
            Self::Change => 2,
            Self::Pattern | Self::Anomaly => 3,
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DetectionStrategy {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl FromStr for DetectionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

#[derive(Serialize, Deserialize)]
pub struct DetectorConfig {
    pub strategy: DetectionStrategy,
    /// Required by `Threshold` only. When absent that strategy abstains.
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Std-dev multiplier for `Anomaly`, minimum relative change for `Change`.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(skip)]
    pub reaction: Option<Box<dyn Reaction>>,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_sensitivity() -> f64 {
    DEFAULT_SENSITIVITY
}

impl DetectorConfig {
    pub fn new(strategy: DetectionStrategy) -> Self {
        Self {
            strategy,
            threshold: None,
            window_size: DEFAULT_WINDOW_SIZE,
            sensitivity: DEFAULT_SENSITIVITY,
            reaction: None,
        }
    }

    pub fn threshold(threshold: f64) -> Self {
        Self::new(DetectionStrategy::Threshold).with_threshold(threshold)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_reaction(mut self, reaction: impl Reaction + 'static) -> Self {
        self.reaction = Some(Box::new(reaction));
        self
    }

    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;

        // Surface unknown strategy names as their own error instead of a
        // generic serde message.
        if let Some(name) = raw.get("strategy").and_then(|v| v.as_str()) {
            name.parse::<DetectionStrategy>()?;
        }

        let config: DetectorConfig = serde_json::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 1 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        if !self.sensitivity.is_finite() || self.sensitivity < 0.0 {
            return Err(ConfigError::InvalidSensitivity(self.sensitivity));
        }
        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }
        Ok(())
    }

    pub fn has_reaction(&self) -> bool {
        self.reaction.is_some()
    }
}

impl fmt::Debug for DetectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorConfig")
            .field("strategy", &self.strategy)
            .field("threshold", &self.threshold)
            .field("window_size", &self.window_size)
            .field("sensitivity", &self.sensitivity)
            .field("reaction", &self.reaction.as_ref().map(|_| "<reaction>"))
            .finish()
    }
}
