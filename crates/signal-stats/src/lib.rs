//! Signal Statistics
//!
//! Descriptive statistics for rolling windows of per-frame samples.

mod statistics;

pub use statistics::{mean, StatisticalFeatures};
