//! Eye signal tracker

use face_landmarks::{centroid, unix_timestamp, EyeLandmarks, Point2};
use ring_buffer::RingBuffer;
use signal_stats::StatisticalFeatures;
use tracing::{debug, info, warn};

use crate::analysis::{BlinkStatistics, EyeMetrics, FrameResult};
use crate::blink::{BlinkEvent, BlinkKind, BlinkParams, BlinkState};
use crate::ear::calculate_ear;
use crate::{EyeTrackerConfig, EyeTrackerError};

/// Converts per-frame eye landmarks into blink events and rolling eye metrics
pub struct EyeSignalTracker {
    config: EyeTrackerConfig,
    state: BlinkState,
    ear_history: RingBuffer<f64>,
    center_history: RingBuffer<Point2>,
    blink_history: RingBuffer<BlinkEvent>,
    total_blinks: u64,
    rapid_blinks: u64,
    prolonged_closures: u64,
    metrics: EyeMetrics,
}

impl EyeSignalTracker {
    /// Create a new tracker with configuration
    pub fn new(config: EyeTrackerConfig) -> Result<Self, EyeTrackerError> {
        config.validate()?;
        info!(
            "Eye tracker initialized (threshold {:.3}, {} frames, window {})",
            config.ear_threshold, config.min_consecutive_frames, config.history_size
        );
        Ok(Self::with_config(config))
    }

    fn with_config(config: EyeTrackerConfig) -> Self {
        Self {
            state: BlinkState::Open,
            ear_history: RingBuffer::new(config.history_size),
            center_history: RingBuffer::new(config.history_size),
            blink_history: RingBuffer::new(config.blink_history_size),
            total_blinks: 0,
            rapid_blinks: 0,
            prolonged_closures: 0,
            metrics: EyeMetrics::default(),
            config,
        }
    }

    /// Process one frame stamped with the current wall-clock time
    pub fn process(&mut self, eyes: &EyeLandmarks) -> FrameResult {
        self.process_at(eyes, unix_timestamp())
    }

    /// Process one frame captured at `timestamp` (seconds)
    pub fn process_at(&mut self, eyes: &EyeLandmarks, timestamp: f64) -> FrameResult {
        let left_ear = eyes.left.as_deref().map(calculate_ear);
        let right_ear = eyes.right.as_deref().map(calculate_ear);

        let avg_ear = match (left_ear, right_ear) {
            (Some(l), Some(r)) => (l + r) / 2.0,
            (Some(ear), None) | (None, Some(ear)) => ear,
            (None, None) => 0.0,
        };

        self.ear_history.push(avg_ear);

        let (next, blink) = self.state.next(avg_ear, timestamp, &self.blink_params());
        self.state = next;
        if let Some(event) = &blink {
            self.record_blink(event.clone());
        }

        let sides: Vec<Point2> = eyes.sides().filter_map(centroid).collect();
        let eye_center = centroid(&sides);
        if let Some(center) = eye_center {
            self.center_history.push(center);
        }

        self.update_metrics(timestamp);

        FrameResult {
            left_ear: left_ear.unwrap_or(0.0),
            right_ear: right_ear.unwrap_or(0.0),
            avg_ear,
            blink_detected: blink.is_some(),
            is_blinking: self.state.is_blinking(),
            total_blinks: self.total_blinks,
            eye_center,
            blink,
            metrics: self.metrics.clone(),
        }
    }

    fn blink_params(&self) -> BlinkParams {
        BlinkParams {
            ear_threshold: self.config.ear_threshold,
            min_consecutive_frames: self.config.min_consecutive_frames,
            rapid_blink_s: self.config.rapid_blink_s,
            prolonged_blink_s: self.config.prolonged_blink_s,
        }
    }

    fn record_blink(&mut self, event: BlinkEvent) {
        self.total_blinks += 1;
        match event.kind {
            BlinkKind::Rapid => self.rapid_blinks += 1,
            BlinkKind::Prolonged => self.prolonged_closures += 1,
            BlinkKind::Normal => {}
        }
        debug!(
            "Blink #{}: {:.3}s, min EAR {:.3} ({:?})",
            self.total_blinks, event.duration, event.min_ear, event.kind
        );
        self.blink_history.push(event);
    }

    fn update_metrics(&mut self, now: f64) {
        let window = self.config.blink_rate_window_s;
        let recent: Vec<f64> = self
            .blink_history
            .iter()
            .filter(|b| now - b.end_time <= window)
            .map(|b| b.duration)
            .collect();

        let durations = StatisticalFeatures::compute(&recent);

        let closure_ratio = if self.ear_history.is_empty() {
            0.0
        } else {
            let closed = self
                .ear_history
                .iter()
                .filter(|&&ear| ear < self.config.ear_threshold)
                .count();
            closed as f64 / self.ear_history.len() as f64
        };

        let centers: Vec<&Point2> = self.center_history.iter().collect();
        let movement = if centers.len() >= 2 {
            let total: f64 = centers.windows(2).map(|w| w[0].distance(w[1])).sum();
            total / (centers.len() - 1) as f64
        } else {
            0.0
        };

        self.metrics = EyeMetrics {
            blink_rate: recent.len() as f64,
            avg_blink_duration: durations.mean,
            eye_closure_ratio: closure_ratio,
            eye_movement_intensity: movement,
            rapid_blinks: self.rapid_blinks,
            prolonged_closures: self.prolonged_closures,
        };
    }

    /// Blink statistics over the last `window_s` seconds of wall-clock time
    pub fn get_blink_statistics(&self, window_s: f64) -> BlinkStatistics {
        self.get_blink_statistics_at(window_s, unix_timestamp())
    }

    /// Blink statistics over the `window_s` seconds ending at `now`
    pub fn get_blink_statistics_at(&self, window_s: f64, now: f64) -> BlinkStatistics {
        if window_s.is_nan() || window_s <= 0.0 {
            return BlinkStatistics::default();
        }

        let recent: Vec<&BlinkEvent> = self
            .blink_history
            .iter()
            .filter(|b| now - b.end_time <= window_s)
            .collect();

        if recent.is_empty() {
            return BlinkStatistics::default();
        }

        let durations: Vec<f64> = recent.iter().map(|b| b.duration).collect();
        let stats = StatisticalFeatures::compute(&durations);

        BlinkStatistics {
            blink_count: recent.len(),
            blink_rate: recent.len() as f64 / (window_s / 60.0),
            avg_duration: stats.mean,
            min_duration: stats.min,
            max_duration: stats.max,
            rapid_blinks: recent.iter().filter(|b| b.kind == BlinkKind::Rapid).count(),
            prolonged_blinks: recent.iter().filter(|b| b.kind == BlinkKind::Prolonged).count(),
        }
    }

    /// Recommend an EAR threshold from the last `samples` EAR values.
    ///
    /// Returns the current threshold when fewer than `samples` values are
    /// held. Never applied automatically; see [`EyeSignalTracker::set_threshold`].
    pub fn calibrate_threshold(&self, samples: usize) -> f64 {
        if samples == 0 || self.ear_history.len() < samples {
            warn!(
                "Not enough samples for calibration: {}/{}",
                self.ear_history.len(),
                samples
            );
            return self.config.ear_threshold;
        }

        let recent: Vec<f64> = self.ear_history.recent(samples).copied().collect();
        self.recommend_threshold(&recent)
    }

    /// Recommend an EAR threshold from open-eye samples collected by the
    /// caller: `max(floor, mean - 2 * std_dev)`. An empty slice keeps the
    /// current threshold.
    pub fn recommend_threshold(&self, samples: &[f64]) -> f64 {
        if samples.is_empty() {
            warn!("No samples for calibration");
            return self.config.ear_threshold;
        }

        let stats = StatisticalFeatures::compute(samples);
        let recommended = (stats.mean - 2.0 * stats.std_dev).max(self.config.calibration_floor);

        info!(
            "Calibrated EAR threshold: {:.3} from {} samples (was {:.3})",
            recommended,
            samples.len(),
            self.config.ear_threshold
        );
        recommended
    }

    /// Apply a new EAR threshold
    pub fn set_threshold(&mut self, threshold: f64) {
        if threshold.is_finite() && threshold > 0.0 {
            info!("EAR threshold set to {:.3}", threshold);
            self.config.ear_threshold = threshold;
        } else {
            warn!("Ignoring invalid EAR threshold {}", threshold);
        }
    }

    /// Clear all histories and counters
    pub fn reset(&mut self) {
        self.ear_history.clear();
        self.center_history.clear();
        self.blink_history.clear();
        self.state = BlinkState::Open;
        self.total_blinks = 0;
        self.rapid_blinks = 0;
        self.prolonged_closures = 0;
        self.metrics = EyeMetrics::default();
        info!("Eye tracking metrics reset");
    }

    pub fn threshold(&self) -> f64 {
        self.config.ear_threshold
    }

    pub fn config(&self) -> &EyeTrackerConfig {
        &self.config
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    pub fn total_blinks(&self) -> u64 {
        self.total_blinks
    }

    pub fn metrics(&self) -> &EyeMetrics {
        &self.metrics
    }

    pub fn ear_history(&self) -> &RingBuffer<f64> {
        &self.ear_history
    }

    pub fn center_history(&self) -> &RingBuffer<Point2> {
        &self.center_history
    }

    pub fn blink_history(&self) -> &RingBuffer<BlinkEvent> {
        &self.blink_history
    }
}

impl Default for EyeSignalTracker {
    fn default() -> Self {
        Self::with_config(EyeTrackerConfig::default())
    }
}
