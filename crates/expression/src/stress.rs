//! Stress indicators, score and level

use serde::{Deserialize, Serialize};

use crate::config::{StressLevelThresholds, StressWeights};

/// Facial stress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressIndicator {
    JawClench,
    LipTightness,
    BrowFurrow,
    MouthTension,
    FacialAsymmetry,
}

impl StressIndicator {
    pub const ALL: [StressIndicator; 5] = [
        StressIndicator::JawClench,
        StressIndicator::LipTightness,
        StressIndicator::BrowFurrow,
        StressIndicator::MouthTension,
        StressIndicator::FacialAsymmetry,
    ];
}

/// Indicator values for one frame, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StressIndicators {
    pub jaw_clench: f64,
    pub lip_tightness: f64,
    pub brow_furrow: f64,
    pub mouth_tension: f64,
    pub facial_asymmetry: f64,
}

impl StressIndicators {
    pub fn get(&self, indicator: StressIndicator) -> f64 {
        match indicator {
            StressIndicator::JawClench => self.jaw_clench,
            StressIndicator::LipTightness => self.lip_tightness,
            StressIndicator::BrowFurrow => self.brow_furrow,
            StressIndicator::MouthTension => self.mouth_tension,
            StressIndicator::FacialAsymmetry => self.facial_asymmetry,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StressIndicator, f64)> + '_ {
        StressIndicator::ALL.into_iter().map(|i| (i, self.get(i)))
    }

    /// Weighted score over all five indicators
    pub fn score(&self, weights: &StressWeights) -> f64 {
        stress_score(self.iter(), weights)
    }
}

/// Weighted mean of the supplied indicators.
///
/// Only the indicators present contribute to the normalizing weight, so a
/// partial set is scored against its own total. Returns 0.0 when nothing with
/// positive weight is supplied.
pub fn stress_score<I>(indicators: I, weights: &StressWeights) -> f64
where
    I: IntoIterator<Item = (StressIndicator, f64)>,
{
    let (weighted, total) = indicators
        .into_iter()
        .fold((0.0, 0.0), |(weighted, total), (indicator, value)| {
            let w = weights.weight(indicator);
            (weighted + value * w, total + w)
        });

    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Mouth tension from the mouth aspect ratio: a mouth pressed flatter than
/// 0.1 height/width ramps linearly to 1.0 when fully closed.
pub fn mouth_tension(aspect_ratio: f64) -> f64 {
    if aspect_ratio < 0.1 {
        ((0.1 - aspect_ratio) * 10.0).min(1.0)
    } else {
        0.0
    }
}

/// Facial asymmetry from the relative corner-distance difference
pub fn facial_asymmetry(relative_difference: f64) -> f64 {
    (relative_difference * 2.0).min(1.0)
}

/// Categorical stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    #[default]
    Low,
    Mild,
    Moderate,
    High,
    VeryHigh,
}

impl StressLevel {
    /// Categorize a score. Each level's interval is closed below and open
    /// above, so a score exactly on a boundary takes the higher level.
    pub fn from_score(score: f64, thresholds: &StressLevelThresholds) -> Self {
        if score.is_nan() || score < thresholds.mild {
            StressLevel::Low
        } else if score < thresholds.moderate {
            StressLevel::Mild
        } else if score < thresholds.high {
            StressLevel::Moderate
        } else if score < thresholds.very_high {
            StressLevel::High
        } else {
            StressLevel::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Mild => "mild",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
            StressLevel::VeryHigh => "very_high",
        }
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
