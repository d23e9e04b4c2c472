//! Landmark stream input
//!
//! One JSON object per line:
//!
//! ```text
//! {"timestamp": 12.4, "landmarks": [[x, y], ...]}
//! {"timestamp": 12.5, "landmarks": null}
//! ```
//!
//! `timestamp` is optional (wall-clock time is used when absent) and a null
//! or missing `landmarks` means no face was detected.

use face_landmarks::LandmarkFrame;
use serde::{Deserialize, Serialize};

use crate::MonitorError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<FrameInput>, MonitorError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| MonitorError::Parse { line: line_no, source })
}
