//! Stress and expression trend over recent snapshots

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use signal_stats::mean;

use crate::expressions::Expression;

/// Direction of the stress score across the trend window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

/// Trend summary of the most recent snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub stress_trend: StressTrend,
    /// 1.0 when every snapshot shares one primary expression
    pub expression_stability: f64,
    pub average_stress: f64,
    pub peak_stress: f64,
    /// Primary expressions, oldest first
    pub recent_expressions: Vec<Expression>,
}

impl Default for TrendAnalysis {
    fn default() -> Self {
        Self {
            stress_trend: StressTrend::Stable,
            expression_stability: 1.0,
            average_stress: 0.0,
            peak_stress: 0.0,
            recent_expressions: Vec::new(),
        }
    }
}

impl TrendAnalysis {
    /// Summarize `(stress_score, primary_expression)` pairs, oldest first.
    /// Change smaller than `stable_delta` between the first and last score
    /// counts as stable.
    pub fn from_window(window: &[(f64, Expression)], stable_delta: f64) -> Self {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return Self::default();
        };

        let delta = last.0 - first.0;
        let stress_trend = if delta.abs() < stable_delta {
            StressTrend::Stable
        } else if delta > 0.0 {
            StressTrend::Increasing
        } else {
            StressTrend::Decreasing
        };

        let scores: Vec<f64> = window.iter().map(|(score, _)| *score).collect();
        let recent_expressions: Vec<Expression> = window.iter().map(|(_, e)| *e).collect();
        let unique = recent_expressions.iter().collect::<HashSet<_>>().len();
        let expression_stability =
            (1.0 - (unique as f64 - 1.0) / recent_expressions.len() as f64).max(0.0);

        Self {
            stress_trend,
            expression_stability,
            average_stress: mean(&scores).unwrap_or(0.0),
            peak_stress: scores.iter().copied().fold(0.0, f64::max),
            recent_expressions,
        }
    }
}
