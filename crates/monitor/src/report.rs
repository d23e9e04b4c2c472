//! Output records, one JSON object per line

use chrono::{DateTime, Utc};
use expression::{StressSnapshot, TrendAnalysis};
use eye_tracker::{BlinkStatistics, FrameResult};
use serde::Serialize;

/// Merged per-frame analysis
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    /// 1-based frame number in the stream
    pub frame: u64,
    pub timestamp: f64,
    /// A valid landmark frame was analyzed
    pub face_detected: bool,
    /// Reasons a supplied landmark frame was rejected
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
    pub eyes: FrameResult,
    pub expression: StressSnapshot,
}

/// End-of-stream summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub frames: u64,
    pub faces_detected: u64,
    pub frames_rejected: u64,
    /// EAR threshold in effect at the end of the session
    pub ear_threshold: f64,
    pub blink_statistics: BlinkStatistics,
    pub trend: TrendAnalysis,
}

/// A line of monitor output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputRecord<'a> {
    Frame(&'a FrameRecord),
    Summary(&'a SessionSummary),
}
