//! Eye tracker configuration

use serde::{Deserialize, Serialize};

use crate::EyeTrackerError;

/// Eye tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeTrackerConfig {
    /// EAR below this value counts as a closed-eye frame
    pub ear_threshold: f64,

    /// Consecutive closed frames required before a closure counts as a blink
    pub min_consecutive_frames: u32,

    /// Capacity of the EAR and eye-center histories (frames)
    pub history_size: usize,

    /// Capacity of the blink event history
    pub blink_history_size: usize,

    /// Blinks shorter than this are rapid (seconds)
    pub rapid_blink_s: f64,

    /// Blinks longer than this are prolonged closures (seconds)
    pub prolonged_blink_s: f64,

    /// Window for the rolling blink rate (seconds)
    pub blink_rate_window_s: f64,

    /// Lowest threshold calibration will ever recommend
    pub calibration_floor: f64,
}

impl Default for EyeTrackerConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            min_consecutive_frames: 3,
            history_size: 30,
            blink_history_size: 100,
            rapid_blink_s: 0.1,
            prolonged_blink_s: 0.5,
            blink_rate_window_s: 60.0,
            calibration_floor: 0.15,
        }
    }
}

impl EyeTrackerConfig {
    /// Reject values the tracker cannot operate with
    pub fn validate(&self) -> Result<(), EyeTrackerError> {
        if !self.ear_threshold.is_finite() || self.ear_threshold <= 0.0 {
            return Err(EyeTrackerError::Config(format!(
                "ear_threshold must be positive, got {}",
                self.ear_threshold
            )));
        }
        if self.min_consecutive_frames == 0 {
            return Err(EyeTrackerError::Config(
                "min_consecutive_frames must be at least 1".into(),
            ));
        }
        if self.history_size == 0 || self.blink_history_size == 0 {
            return Err(EyeTrackerError::Config(
                "history sizes must be at least 1".into(),
            ));
        }
        if self.rapid_blink_s > self.prolonged_blink_s {
            return Err(EyeTrackerError::Config(format!(
                "rapid_blink_s ({}) exceeds prolonged_blink_s ({})",
                self.rapid_blink_s, self.prolonged_blink_s
            )));
        }
        if self.blink_rate_window_s.is_nan() || self.blink_rate_window_s <= 0.0 {
            return Err(EyeTrackerError::Config(
                "blink_rate_window_s must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EyeTrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_frames() {
        let config = EyeTrackerConfig {
            min_consecutive_frames: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EyeTrackerError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        for threshold in [0.0, -0.1, f64::NAN] {
            let config = EyeTrackerConfig {
                ear_threshold: threshold,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_partial_deserialize() {
        let config: EyeTrackerConfig =
            serde_json::from_str(r#"{ "ear_threshold": 0.2 }"#).unwrap();
        assert_eq!(config.ear_threshold, 0.2);
        assert_eq!(config.min_consecutive_frames, 3);
        assert_eq!(config.history_size, 30);
    }
}
