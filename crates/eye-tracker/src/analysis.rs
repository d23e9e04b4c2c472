//! Eye tracking results

use face_landmarks::Point2;
use serde::{Deserialize, Serialize};

use crate::blink::BlinkEvent;

/// Rolling eye metrics, recomputed every frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeMetrics {
    /// Blinks completed within the blink-rate window (per minute for a 60s window)
    pub blink_rate: f64,
    /// Mean duration of those blinks (seconds)
    pub avg_blink_duration: f64,
    /// Fraction of EAR history below threshold (0-1)
    pub eye_closure_ratio: f64,
    /// Mean eye-center displacement between consecutive frames (pixels)
    pub eye_movement_intensity: f64,
    /// Rapid blinks since last reset
    pub rapid_blinks: u64,
    /// Prolonged closures since last reset
    pub prolonged_closures: u64,
}

/// Per-frame eye tracking result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub left_ear: f64,
    pub right_ear: f64,
    pub avg_ear: f64,
    /// A blink completed on this frame
    pub blink_detected: bool,
    /// A confirmed closure is in progress
    pub is_blinking: bool,
    pub total_blinks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_center: Option<Point2>,
    /// The blink completed on this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink: Option<BlinkEvent>,
    pub metrics: EyeMetrics,
}

/// Blink statistics over a time window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkStatistics {
    pub blink_count: usize,
    /// Blinks per minute
    pub blink_rate: f64,
    pub avg_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    pub rapid_blinks: usize,
    pub prolonged_blinks: usize,
}
