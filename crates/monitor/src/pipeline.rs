//! Per-frame analysis pipeline

use chrono::{DateTime, Utc};
use expression::{ExpressionStressScorer, StressLevel};
use eye_tracker::EyeSignalTracker;
use face_landmarks::{unix_timestamp, EyeLandmarks, FrameValidator, ValidationConfig};
use ring_buffer::RingBuffer;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::input::FrameInput;
use crate::report::{FrameRecord, SessionSummary};
use crate::MonitorError;

/// Runs both analyzers over a landmark stream and keeps session counters
pub struct StressMonitor {
    config: MonitorConfig,
    validator: FrameValidator,
    tracker: EyeSignalTracker,
    scorer: ExpressionStressScorer,
    started_at: DateTime<Utc>,
    frames: u64,
    faces_detected: u64,
    frames_rejected: u64,
    baseline_calibrated: bool,
    threshold_calibrated: bool,
    /// Average EAR of accepted face frames seen while calibrating
    calibration_ears: RingBuffer<f64>,
    last_timestamp: Option<f64>,
}

impl StressMonitor {
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;

        let topology = &config.expression.topology;
        let validator = FrameValidator::new(ValidationConfig {
            min_points: topology.point_count.max(topology.max_index() + 1),
            require_finite: true,
        });
        let tracker = EyeSignalTracker::new(config.eye_tracker.clone())?;
        let scorer = ExpressionStressScorer::new(config.expression.clone())?;
        let calibrating = config.calibration_frames > 0;

        info!(
            topology = %config.expression.topology.name,
            calibration_frames = config.calibration_frames,
            "Stress monitor ready"
        );

        Ok(Self {
            validator,
            tracker,
            scorer,
            started_at: Utc::now(),
            frames: 0,
            faces_detected: 0,
            frames_rejected: 0,
            baseline_calibrated: !calibrating,
            threshold_calibrated: !calibrating,
            calibration_ears: RingBuffer::new(config.calibration_frames),
            last_timestamp: None,
            config,
        })
    }

    /// Analyze one input frame
    pub fn process(&mut self, input: FrameInput) -> FrameRecord {
        let timestamp = input.timestamp.unwrap_or_else(unix_timestamp);
        self.frames += 1;
        self.last_timestamp = Some(timestamp);
        metrics::counter!("stress_monitor_frames_total").increment(1);

        let mut rejected = Vec::new();
        let face = match input.landmarks.filter(|f| !f.is_empty()) {
            Some(frame) => {
                let result = self.validator.validate(&frame);
                if result.valid {
                    Some(frame)
                } else {
                    warn!(frame = self.frames, errors = ?result.errors, "Landmark frame rejected");
                    self.frames_rejected += 1;
                    metrics::counter!("stress_monitor_frames_rejected_total").increment(1);
                    rejected = result.errors.iter().map(ToString::to_string).collect();
                    None
                }
            }
            None => None,
        };

        if let Some(frame) = &face {
            self.faces_detected += 1;
            metrics::counter!("stress_monitor_faces_total").increment(1);
            if !self.baseline_calibrated {
                self.baseline_calibrated = self.scorer.calibrate_baseline(frame).is_ok();
            }
        }

        let eyes = match &face {
            Some(frame) => self.config.expression.topology.eye_landmarks(frame),
            None => EyeLandmarks::default(),
        };
        let eye_result = self.tracker.process_at(&eyes, timestamp);
        let snapshot = self.scorer.analyze_at(face.as_ref(), timestamp);

        if face.is_some() {
            self.calibrate_threshold(eye_result.avg_ear);
        }
        self.record_metrics(eye_result.blink_detected, snapshot.stress_score, eye_result.metrics.blink_rate);

        if snapshot.stress_level >= StressLevel::High {
            warn!(
                frame = self.frames,
                score = snapshot.stress_score,
                level = %snapshot.stress_level,
                "Elevated stress"
            );
        }
        if let Some(blink) = &eye_result.blink {
            debug!(frame = self.frames, duration = blink.duration, kind = ?blink.kind, "Blink");
        }

        FrameRecord {
            frame: self.frames,
            timestamp,
            face_detected: face.is_some(),
            rejected,
            eyes: eye_result,
            expression: snapshot,
        }
    }

    /// Collect the EAR of an accepted face frame and apply the recommended
    /// threshold once `calibration_frames` of them are held
    fn calibrate_threshold(&mut self, avg_ear: f64) {
        if self.threshold_calibrated {
            return;
        }
        self.calibration_ears.push(avg_ear);
        if !self.calibration_ears.is_full() {
            return;
        }

        let threshold = self.tracker.recommend_threshold(&self.calibration_ears.to_vec());
        self.tracker.set_threshold(threshold);
        self.threshold_calibrated = true;
        info!(threshold, frames = self.calibration_ears.capacity(), "EAR threshold calibrated");
        self.calibration_ears.clear();
    }

    fn record_metrics(&self, blink_detected: bool, stress_score: f64, blink_rate: f64) {
        if blink_detected {
            metrics::counter!("stress_monitor_blinks_total").increment(1);
        }
        metrics::gauge!("stress_monitor_stress_score").set(stress_score);
        metrics::gauge!("stress_monitor_blink_rate").set(blink_rate);
    }

    /// Summarize the session so far
    pub fn summary(&self) -> SessionSummary {
        let now = self.last_timestamp.unwrap_or_else(unix_timestamp);
        SessionSummary {
            started_at: self.started_at,
            finished_at: Utc::now(),
            frames: self.frames,
            faces_detected: self.faces_detected,
            frames_rejected: self.frames_rejected,
            ear_threshold: self.tracker.threshold(),
            blink_statistics: self
                .tracker
                .get_blink_statistics_at(self.config.eye_tracker.blink_rate_window_s, now),
            trend: self.scorer.get_trend_analysis(),
        }
    }

    pub fn tracker(&self) -> &EyeSignalTracker {
        &self.tracker
    }

    pub fn scorer(&self) -> &ExpressionStressScorer {
        &self.scorer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use face_landmarks::{LandmarkFrame, LandmarkTopology, Point2};

    /// Eye of width 30 centered at `(cx, cy)` whose EAR equals `ear`, in
    /// outer, top, top, inner, bottom, bottom order
    fn eye(ear: f64, cx: f64, cy: f64) -> [Point2; 6] {
        let w = 30.0;
        let h = ear * w / 2.0;
        [
            Point2::new(cx - w / 2.0, cy),
            Point2::new(cx - w / 6.0, cy - h),
            Point2::new(cx + w / 6.0, cy - h),
            Point2::new(cx + w / 2.0, cy),
            Point2::new(cx + w / 6.0, cy + h),
            Point2::new(cx - w / 6.0, cy + h),
        ]
    }

    /// Full 468-point face with eyes at the given EAR
    pub(crate) fn face(ear: f64) -> LandmarkFrame {
        let topo = LandmarkTopology::face_mesh_468();
        let mut points = vec![Point2::new(200.0, 200.0); topo.point_count];

        for (&i, p) in topo.left_eye.iter().zip(eye(ear, 150.0, 150.0)) {
            points[i] = p;
        }
        for (&i, p) in topo.right_eye.iter().zip(eye(ear, 250.0, 150.0)) {
            points[i] = p;
        }

        points[topo.mouth_corners.0] = Point2::new(180.0, 260.0);
        points[topo.mouth_corners.1] = Point2::new(220.0, 260.0);
        points[topo.upper_lip] = Point2::new(200.0, 256.0);
        points[topo.lower_lip] = Point2::new(200.0, 264.0);
        points[topo.inner_brows.0] = Point2::new(165.0, 130.0);
        points[topo.inner_brows.1] = Point2::new(235.0, 130.0);
        points[topo.outer_brows.0] = Point2::new(130.0, 130.0);
        points[topo.outer_brows.1] = Point2::new(270.0, 130.0);
        points[topo.face_height.0] = Point2::new(200.0, 80.0);
        points[topo.face_height.1] = Point2::new(200.0, 320.0);
        points[topo.jaw_width.0] = Point2::new(140.0, 290.0);
        points[topo.jaw_width.1] = Point2::new(260.0, 290.0);
        points[topo.jaw_bottom] = Point2::new(200.0, 270.0);

        LandmarkFrame::new(points)
    }

    pub(crate) fn at(timestamp: f64, landmarks: Option<LandmarkFrame>) -> FrameInput {
        FrameInput {
            timestamp: Some(timestamp),
            landmarks,
        }
    }

    fn monitor(calibration_frames: usize) -> StressMonitor {
        StressMonitor::new(MonitorConfig {
            calibration_frames,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_face_frame_analyzed() {
        let mut monitor = monitor(0);
        let record = monitor.process(at(0.0, Some(face(0.3))));
        assert_eq!(record.frame, 1);
        assert!(record.face_detected);
        assert!(record.rejected.is_empty());
        assert!((record.eyes.avg_ear - 0.3).abs() < 1e-9);
        assert_eq!(record.expression.action_units.len(), 8);
        assert_eq!(monitor.scorer().history().len(), 1);
    }

    #[test]
    fn test_no_face_frame() {
        let mut monitor = monitor(0);
        let record = monitor.process(at(0.0, None));
        assert!(!record.face_detected);
        assert_eq!(record.eyes.avg_ear, 0.0);
        assert_eq!(record.expression.expressions.neutral, 1.0);
        assert!(monitor.scorer().history().is_empty());

        let summary = monitor.summary();
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.faces_detected, 0);
    }

    #[test]
    fn test_invalid_frame_rejected() {
        let mut monitor = monitor(0);
        let short = LandmarkFrame::new(vec![Point2::new(1.0, 1.0); 10]);
        let record = monitor.process(at(0.0, Some(short)));
        assert!(!record.face_detected);
        assert_eq!(record.rejected.len(), 1);
        assert_eq!(monitor.summary().frames_rejected, 1);

        let mut points = face(0.3).points().to_vec();
        points[5].x = f64::NAN;
        let record = monitor.process(at(0.1, Some(LandmarkFrame::new(points))));
        assert!(!record.face_detected);
        assert_eq!(monitor.summary().frames_rejected, 2);
    }

    #[test]
    fn test_blink_detected_through_pipeline() {
        let mut monitor = monitor(0);
        let ears = [0.3, 0.3, 0.3, 0.1, 0.1, 0.1, 0.1, 0.3, 0.3];
        let blinks: Vec<u64> = ears
            .iter()
            .enumerate()
            .map(|(i, &ear)| monitor.process(at(i as f64 * 0.1, Some(face(ear)))))
            .filter(|r| r.eyes.blink_detected)
            .map(|r| r.frame)
            .collect();
        assert_eq!(blinks, vec![8]);
        assert_eq!(monitor.summary().blink_statistics.blink_count, 1);
    }

    #[test]
    fn test_calibration_sets_baseline_and_threshold() {
        let mut monitor = monitor(5);
        assert!(!monitor.scorer().baseline().is_calibrated());

        monitor.process(at(0.0, Some(face(0.3))));
        assert!(monitor.scorer().baseline().is_calibrated());
        assert_eq!(monitor.tracker().threshold(), 0.25);

        for i in 1..5 {
            monitor.process(at(i as f64 * 0.1, Some(face(0.3))));
        }
        // Constant EAR: mean 0.3, std 0
        assert!((monitor.tracker().threshold() - 0.3).abs() < 1e-9);
        assert!((monitor.summary().ear_threshold - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_calibration_counts_face_frames_only() {
        let mut monitor = monitor(3);
        monitor.process(at(0.0, Some(face(0.3))));
        monitor.process(at(0.1, None));
        monitor.process(at(0.2, Some(face(0.3))));
        assert_eq!(monitor.tracker().threshold(), 0.25);
        monitor.process(at(0.3, Some(face(0.3))));
        assert!((monitor.tracker().threshold() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_rejected_frames_do_not_skew_calibration() {
        let mut monitor = monitor(3);
        let mut points = face(0.3).points().to_vec();
        points[0].y = f64::INFINITY;

        monitor.process(at(0.0, Some(face(0.3))));
        monitor.process(at(0.1, None));
        monitor.process(at(0.2, Some(LandmarkFrame::new(points))));
        monitor.process(at(0.3, Some(face(0.3))));
        monitor.process(at(0.4, None));
        monitor.process(at(0.5, Some(face(0.3))));

        // The tracker history holds zeros, the calibration samples do not
        assert_eq!(monitor.tracker().calibrate_threshold(3), 0.15);
        assert!((monitor.tracker().threshold() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_validator_requires_every_topology_index() {
        let mut config = MonitorConfig {
            calibration_frames: 0,
            ..Default::default()
        };
        // Understated point count; jaw width still reads index 397
        config.expression.topology.point_count = 10;
        let mut monitor = StressMonitor::new(config).unwrap();

        let short = LandmarkFrame::new(face(0.3).points()[..300].to_vec());
        let record = monitor.process(at(0.0, Some(short)));
        assert!(!record.face_detected);
        assert_eq!(record.rejected.len(), 1);

        let record = monitor.process(at(0.1, Some(face(0.3))));
        assert!(record.face_detected);
    }

    #[test]
    fn test_summary_trend() {
        let mut monitor = monitor(0);
        for i in 0..6 {
            monitor.process(at(i as f64, Some(face(0.3))));
        }
        let summary = monitor.summary();
        assert_eq!(summary.frames, 6);
        assert_eq!(summary.faces_detected, 6);
        assert_eq!(summary.trend.recent_expressions.len(), 6);
        assert_eq!(summary.trend.expression_stability, 1.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = MonitorConfig::default();
        config.expression.history_size = 0;
        assert!(StressMonitor::new(config).is_err());
    }

    #[test]
    fn test_calibration_longer_than_tracker_history() {
        let mut monitor = monitor(40);
        for i in 0..39 {
            monitor.process(at(i as f64 * 0.1, Some(face(0.3))));
        }
        assert_eq!(monitor.tracker().threshold(), 0.25);
        monitor.process(at(3.9, Some(face(0.3))));
        assert!((monitor.tracker().threshold() - 0.3).abs() < 1e-9);
    }
}
