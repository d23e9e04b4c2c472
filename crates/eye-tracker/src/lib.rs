//! Eye Signal Tracking
//!
//! Per-frame eye analysis from facial landmarks:
//! - Eye Aspect Ratio (EAR) per eye
//! - Debounced blink detection (explicit state machine)
//! - Rolling blink rate, closure ratio and eye movement intensity
//! - Windowed blink statistics and EAR threshold calibration
//!
//! The tracker is single-writer: every call takes `&mut self` and no
//! internal locking is performed.

pub mod analysis;
pub mod blink;
pub mod config;
pub mod ear;
pub mod tracker;

pub use analysis::{BlinkStatistics, EyeMetrics, FrameResult};
pub use blink::{BlinkEvent, BlinkKind, BlinkState};
pub use config::EyeTrackerConfig;
pub use ear::calculate_ear;
pub use tracker::EyeSignalTracker;

use thiserror::Error;

/// Eye tracker error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EyeTrackerError {
    #[error("Configuration error: {0}")]
    Config(String),
}
