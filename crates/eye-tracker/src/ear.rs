//! Eye Aspect Ratio

use face_landmarks::Point2;

/// Eye Aspect Ratio for a 6-point eye.
///
/// Points are ordered outer corner, top 1, top 2, inner corner, bottom 2,
/// bottom 1:
///
/// `EAR = (|p1 - p5| + |p2 - p4|) / (2 * |p0 - p3|)`
///
/// Returns 0.0 for fewer than 6 points or a zero-width eye.
pub fn calculate_ear(eye: &[Point2]) -> f64 {
    if eye.len() < 6 {
        return 0.0;
    }

    let vertical_1 = eye[1].distance(&eye[5]);
    let vertical_2 = eye[2].distance(&eye[4]);
    let horizontal = eye[0].distance(&eye[3]);

    if horizontal == 0.0 {
        return 0.0;
    }

    (vertical_1 + vertical_2) / (2.0 * horizontal)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Synthetic eye of width 30 whose EAR equals `ear`, centered at `(cx, cy)`
    pub(crate) fn eye_with_ear(ear: f64, cx: f64, cy: f64) -> Vec<Point2> {
        let w = 30.0;
        let h = ear * w / 2.0;
        vec![
            Point2::new(cx - w / 2.0, cy),
            Point2::new(cx - w / 6.0, cy - h),
            Point2::new(cx + w / 6.0, cy - h),
            Point2::new(cx + w / 2.0, cy),
            Point2::new(cx + w / 6.0, cy + h),
            Point2::new(cx - w / 6.0, cy + h),
        ]
    }

    #[test]
    fn test_open_eye_above_threshold() {
        let eye = vec![
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 2.0),
            Point2::new(20.0, 2.0),
            Point2::new(30.0, 10.0),
            Point2::new(20.0, 18.0),
            Point2::new(10.0, 18.0),
        ];
        // (16 + 16) / (2 * 30)
        let ear = calculate_ear(&eye);
        assert!((ear - 32.0 / 60.0).abs() < 1e-12);
        assert!(ear > 0.2);
    }

    #[test]
    fn test_synthetic_helper_matches() {
        for target in [0.05, 0.25, 0.35] {
            let ear = calculate_ear(&eye_with_ear(target, 100.0, 50.0));
            assert!((ear - target).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flattened_eye_is_zero() {
        // Lids meet: every point on y = 10
        let flat = vec![
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 10.0),
            Point2::new(30.0, 10.0),
            Point2::new(20.0, 10.0),
            Point2::new(10.0, 10.0),
        ];
        assert_eq!(calculate_ear(&flat), 0.0);
    }

    #[test]
    fn test_too_few_points() {
        let eye = vec![Point2::new(0.0, 0.0); 5];
        assert_eq!(calculate_ear(&eye), 0.0);
        assert_eq!(calculate_ear(&[]), 0.0);
    }

    #[test]
    fn test_zero_horizontal_distance() {
        let eye = vec![
            Point2::new(5.0, 5.0),
            Point2::new(4.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(6.0, 10.0),
            Point2::new(4.0, 10.0),
        ];
        assert_eq!(calculate_ear(&eye), 0.0);
    }
}
