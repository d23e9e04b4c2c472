//! Expression and Stress Scoring
//!
//! Derives facial action units (AU) from landmark geometry and combines them
//! into:
//! - Expression probabilities and a primary expression
//! - Stress indicators, a weighted stress score and a stress level
//! - Trend analysis over recent snapshots
//!
//! Every AU is computed independently; a failed AU contributes 0.0.

pub mod action_units;
pub mod baseline;
pub mod config;
pub mod expressions;
pub mod scorer;
pub mod stress;
pub mod trend;

pub use action_units::{ActionUnit, ActionUnits};
pub use baseline::BaselineMeasurements;
pub use config::{ExpressionConfig, StressLevelThresholds, StressWeights};
pub use expressions::{Expression, ExpressionScores};
pub use scorer::{ExpressionStressScorer, StressSnapshot};
pub use stress::{stress_score, StressIndicator, StressIndicators, StressLevel};
pub use trend::{StressTrend, TrendAnalysis};

use thiserror::Error;

/// Expression scorer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Configuration error: {0}")]
    Config(String),
}
