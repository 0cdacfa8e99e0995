//! Bounded FIFO window over the most recent samples.

use crate::result::Trend;
use serde::Serialize;
use std::collections::VecDeque;

/// Up-front allocation limit; larger windows grow on demand.
const PREALLOC_LIMIT: usize = 1024;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SlidingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl SlidingWindow {
    /// `capacity` is clamped to at least 1; callers validate beforehand.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity.min(PREALLOC_LIMIT)),
            capacity,
        }
    }

    /// Append a sample, evicting and returning the oldest one if the window
    /// was already full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// `(previous, current)` for the two newest samples.
    pub fn last_two(&self) -> Option<(f64, f64)> {
        let n = self.values.len();
        if n < 2 {
            return None;
        }
        Some((self.values[n - 2], self.values[n - 1]))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Mean and population standard deviation (divides by N, not N-1).
    pub fn population_std_dev(&self) -> Option<(f64, f64)> {
        let mean = self.mean()?;
        let n = self.values.len() as f64;
        let variance = self
            .values
            .iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / n;
        Some((mean, variance.sqrt()))
    }

    /// Strict monotonicity over the whole window. Any tie yields `Trend::None`.
    pub fn trend(&self) -> Trend {
        let pairs = || self.values.iter().zip(self.values.iter().skip(1));

        if self.values.len() < 2 {
            return Trend::None;
        }
        if pairs().all(|(a, b)| a < b) {
            Trend::Increasing
        } else if pairs().all(|(a, b)| a > b) {
            Trend::Decreasing
        } else {
            Trend::None
        }
    }
}
