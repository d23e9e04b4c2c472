//! Expression scorer configuration

use face_landmarks::LandmarkTopology;
use serde::{Deserialize, Serialize};

use crate::stress::StressIndicator;
use crate::ExpressionError;

/// Weight of each stress indicator in the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressWeights {
    pub jaw_clench: f64,
    pub lip_tightness: f64,
    pub brow_furrow: f64,
    pub mouth_tension: f64,
    pub facial_asymmetry: f64,
}

impl Default for StressWeights {
    fn default() -> Self {
        Self {
            jaw_clench: 0.3,
            lip_tightness: 0.2,
            brow_furrow: 0.2,
            mouth_tension: 0.15,
            facial_asymmetry: 0.15,
        }
    }
}

impl StressWeights {
    pub fn weight(&self, indicator: StressIndicator) -> f64 {
        match indicator {
            StressIndicator::JawClench => self.jaw_clench,
            StressIndicator::LipTightness => self.lip_tightness,
            StressIndicator::BrowFurrow => self.brow_furrow,
            StressIndicator::MouthTension => self.mouth_tension,
            StressIndicator::FacialAsymmetry => self.facial_asymmetry,
        }
    }
}

/// Lower bounds of each stress level above `low`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressLevelThresholds {
    pub mild: f64,
    pub moderate: f64,
    pub high: f64,
    pub very_high: f64,
}

impl Default for StressLevelThresholds {
    fn default() -> Self {
        Self {
            mild: 0.2,
            moderate: 0.4,
            high: 0.6,
            very_high: 0.8,
        }
    }
}

/// Expression scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    /// Capacity of the snapshot history
    pub history_size: usize,

    /// Landmark indices for the detector in use
    pub topology: LandmarkTopology,

    pub weights: StressWeights,

    pub level_thresholds: StressLevelThresholds,

    /// Snapshots required before a trend is reported
    pub trend_min_samples: usize,

    /// Most recent snapshots considered by the trend
    pub trend_window: usize,

    /// Score change below which the trend is stable
    pub trend_stable_delta: f64,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            history_size: 30,
            topology: LandmarkTopology::default(),
            weights: StressWeights::default(),
            level_thresholds: StressLevelThresholds::default(),
            trend_min_samples: 5,
            trend_window: 10,
            trend_stable_delta: 0.1,
        }
    }
}

impl ExpressionConfig {
    pub fn validate(&self) -> Result<(), ExpressionError> {
        if self.history_size == 0 {
            return Err(ExpressionError::Config("history_size must be at least 1".into()));
        }
        if self.trend_window == 0 || self.trend_min_samples == 0 {
            return Err(ExpressionError::Config(
                "trend_window and trend_min_samples must be at least 1".into(),
            ));
        }

        let weights = self.weights;
        let all = [
            weights.jaw_clench,
            weights.lip_tightness,
            weights.brow_furrow,
            weights.mouth_tension,
            weights.facial_asymmetry,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ExpressionError::Config(format!(
                "stress weights must be finite and non-negative, got {:?}",
                weights
            )));
        }

        let t = self.level_thresholds;
        let ascending = 0.0 <= t.mild && t.mild <= t.moderate && t.moderate <= t.high && t.high <= t.very_high;
        if !ascending {
            return Err(ExpressionError::Config(format!(
                "stress level thresholds must ascend from 0, got {:?}",
                t
            )));
        }

        Ok(())
    }
}
