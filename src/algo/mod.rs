//! Detection strategies.
//!
//! Each strategy is a pure function of the current window (plus its own
//! parameters) and the evaluation instant. They never fail: numeric corner
//! cases fall back to defined values and short windows abstain.

pub mod anomaly;
pub mod change;
pub mod pattern;
pub mod threshold;
