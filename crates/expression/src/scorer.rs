//! Expression and stress scorer

use face_landmarks::{unix_timestamp, LandmarkError, LandmarkFrame};
use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::action_units::{self, ActionUnit, ActionUnits};
use crate::baseline::BaselineMeasurements;
use crate::config::ExpressionConfig;
use crate::expressions::{Expression, ExpressionScores};
use crate::stress::{self, StressIndicators, StressLevel};
use crate::trend::TrendAnalysis;
use crate::ExpressionError;

/// Analysis of a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressSnapshot {
    pub timestamp: f64,
    pub action_units: ActionUnits,
    pub expressions: ExpressionScores,
    pub stress_indicators: StressIndicators,
    pub stress_score: f64,
    pub stress_level: StressLevel,
    pub primary_expression: Expression,
}

impl StressSnapshot {
    /// Result for a frame without a face
    pub fn neutral(timestamp: f64) -> Self {
        Self {
            timestamp,
            action_units: ActionUnits::default(),
            expressions: ExpressionScores::default(),
            stress_indicators: StressIndicators::default(),
            stress_score: 0.0,
            stress_level: StressLevel::Low,
            primary_expression: Expression::Neutral,
        }
    }
}

/// Facial expression and stress scorer.
///
/// Keeps a bounded history of snapshots for trend analysis and a baseline of
/// the driver's relaxed face. Requires `&mut self` per frame; callers on
/// several threads wrap it in their own lock.
pub struct ExpressionStressScorer {
    config: ExpressionConfig,
    baseline: BaselineMeasurements,
    history: RingBuffer<StressSnapshot>,
}

impl ExpressionStressScorer {
    pub fn new(config: ExpressionConfig) -> Result<Self, ExpressionError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: ExpressionConfig) -> Self {
        info!(
            topology = %config.topology.name,
            history_size = config.history_size,
            "Expression scorer initialized"
        );
        Self {
            history: RingBuffer::new(config.history_size),
            baseline: BaselineMeasurements::default(),
            config,
        }
    }

    /// Analyze a frame stamped with the current wall-clock time
    pub fn analyze(&mut self, frame: Option<&LandmarkFrame>) -> StressSnapshot {
        self.analyze_at(frame, unix_timestamp())
    }

    /// Analyze a frame at `timestamp` (seconds).
    ///
    /// A missing or empty frame yields the neutral snapshot and is not added
    /// to the history.
    pub fn analyze_at(&mut self, frame: Option<&LandmarkFrame>, timestamp: f64) -> StressSnapshot {
        let Some(frame) = frame.filter(|f| !f.is_empty()) else {
            return StressSnapshot::neutral(timestamp);
        };

        let action_units = self.action_units(frame);
        let expressions = ExpressionScores::from_action_units(&action_units);
        let stress_indicators = self.stress_indicators(frame, &action_units);
        let stress_score = stress_indicators.score(&self.config.weights);
        let stress_level = StressLevel::from_score(stress_score, &self.config.level_thresholds);

        let snapshot = StressSnapshot {
            timestamp,
            primary_expression: expressions.primary(),
            action_units,
            expressions,
            stress_indicators,
            stress_score,
            stress_level,
        };

        debug!(
            stress_score = snapshot.stress_score,
            level = %snapshot.stress_level,
            primary = %snapshot.primary_expression,
            "Frame analyzed"
        );

        self.history.push(snapshot.clone());
        snapshot
    }

    /// Compute every AU independently; a failed AU reads as 0.0
    fn action_units(&mut self, frame: &LandmarkFrame) -> ActionUnits {
        ActionUnit::ALL
            .into_iter()
            .map(|unit| {
                let value = self.action_unit(unit, frame).unwrap_or_else(|e| {
                    debug!(?unit, error = %e, "Action unit unavailable");
                    0.0
                });
                (unit, value)
            })
            .collect()
    }

    fn action_unit(&mut self, unit: ActionUnit, frame: &LandmarkFrame) -> Result<f64, LandmarkError> {
        let topology = &self.config.topology;
        match unit {
            ActionUnit::AU12 => action_units::smile(frame, topology),
            ActionUnit::AU15 => action_units::frown(frame, topology),
            ActionUnit::AU4 => action_units::brow_furrow(frame, topology),
            ActionUnit::AU1 => action_units::inner_brow_raise(frame, topology),
            ActionUnit::AU2 => action_units::outer_brow_raise(frame, topology),
            ActionUnit::AU26 => action_units::jaw_drop(frame, topology),
            ActionUnit::AU23 => action_units::lip_tightness(frame, topology),
            ActionUnit::JawClench => {
                let width = action_units::jaw_width(frame, topology)?;
                match self.baseline.jaw_width {
                    Some(baseline) => action_units::jaw_clench(width, baseline),
                    None if width > 0.0 => {
                        debug!(jaw_width = width, "Jaw width baseline set from first frame");
                        self.baseline.jaw_width = Some(width);
                        Ok(0.0)
                    }
                    None => Err(LandmarkError::DegenerateGeometry("jaw width")),
                }
            }
        }
    }

    fn stress_indicators(&self, frame: &LandmarkFrame, units: &ActionUnits) -> StressIndicators {
        let topology = &self.config.topology;
        let mouth_tension = action_units::mouth_aspect_ratio(frame, topology)
            .map(stress::mouth_tension)
            .unwrap_or(0.0);
        let facial_asymmetry = action_units::mouth_asymmetry(frame, topology)
            .map(stress::facial_asymmetry)
            .unwrap_or(0.0);

        StressIndicators {
            jaw_clench: units.get(ActionUnit::JawClench),
            lip_tightness: units.get(ActionUnit::AU23),
            brow_furrow: units.get(ActionUnit::AU4),
            mouth_tension,
            facial_asymmetry,
        }
    }

    /// Record the driver's relaxed face as the baseline.
    ///
    /// On failure the previous baseline is kept.
    pub fn calibrate_baseline(&mut self, frame: &LandmarkFrame) -> Result<BaselineMeasurements, LandmarkError> {
        match BaselineMeasurements::measure(frame, &self.config.topology) {
            Ok(baseline) => {
                self.baseline = baseline;
                info!(?baseline, "Baseline calibration completed");
                Ok(baseline)
            }
            Err(e) => {
                error!(error = %e, "Baseline calibration failed");
                Err(e)
            }
        }
    }

    /// Trend over the most recent snapshots, or the stable default while
    /// fewer than `trend_min_samples` frames have been analyzed
    pub fn get_trend_analysis(&self) -> TrendAnalysis {
        if self.history.len() < self.config.trend_min_samples {
            return TrendAnalysis::default();
        }

        let window: Vec<(f64, Expression)> = self
            .history
            .recent(self.config.trend_window)
            .into_iter()
            .map(|s| (s.stress_score, s.primary_expression))
            .collect();
        TrendAnalysis::from_window(&window, self.config.trend_stable_delta)
    }

    /// Clear the snapshot history. The baseline is kept.
    pub fn reset(&mut self) {
        self.history.clear();
        info!("Expression history reset");
    }

    pub fn baseline(&self) -> &BaselineMeasurements {
        &self.baseline
    }

    pub fn history(&self) -> &RingBuffer<StressSnapshot> {
        &self.history
    }

    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }
}

impl Default for ExpressionStressScorer {
    fn default() -> Self {
        Self::with_config(ExpressionConfig::default())
    }
}
