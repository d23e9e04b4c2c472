//! Detector landmark index sets
//!
//! Which landmark index means what depends on the detector model. The
//! defaults target the 468-point face mesh; other detectors supply their own
//! [`LandmarkTopology`] through configuration.

use serde::{Deserialize, Serialize};

use crate::{EyeLandmarks, LandmarkFrame};

/// 6-point eye model: outer corner, top 1, top 2, inner corner, bottom 2, bottom 1
pub type EyeIndices = [usize; 6];

/// Landmark indices for every region the analyzers read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkTopology {
    /// Detector name, informational
    pub name: String,
    /// Minimum number of points a frame must carry
    pub point_count: usize,

    pub left_eye: EyeIndices,
    pub right_eye: EyeIndices,

    /// Left and right mouth corners
    pub mouth_corners: (usize, usize),
    /// Upper lip center
    pub upper_lip: usize,
    /// Lower lip center
    pub lower_lip: usize,

    /// Inner brow points (left, right)
    pub inner_brows: (usize, usize),
    /// Outer brow points (left, right)
    pub outer_brows: (usize, usize),

    /// Left eye horizontal corners, averaged into the left eye center
    pub left_eye_corners: (usize, usize),
    /// Right eye horizontal corners, averaged into the right eye center
    pub right_eye_corners: (usize, usize),
    /// Outer eye corners (left, right), reference for outer brow raise
    pub outer_eye_corners: (usize, usize),

    /// Forehead top and chin, vertical span used as face height
    pub face_height: (usize, usize),

    /// Left and right jaw angle points
    pub jaw_width: (usize, usize),
    /// Lower jaw point used for jaw-drop
    pub jaw_bottom: usize,
}

impl Default for LandmarkTopology {
    fn default() -> Self {
        Self::face_mesh_468()
    }
}

impl LandmarkTopology {
    /// 468-point face mesh
    pub fn face_mesh_468() -> Self {
        Self {
            name: "face_mesh_468".to_string(),
            point_count: 468,
            left_eye: [33, 160, 158, 133, 153, 144],
            right_eye: [362, 385, 387, 263, 373, 380],
            mouth_corners: (61, 291),
            upper_lip: 13,
            lower_lip: 14,
            inner_brows: (46, 276),
            outer_brows: (53, 283),
            left_eye_corners: (33, 133),
            right_eye_corners: (362, 263),
            outer_eye_corners: (33, 362),
            face_height: (10, 152),
            jaw_width: (172, 397),
            jaw_bottom: 17,
        }
    }

    /// Largest index referenced by this topology
    pub fn max_index(&self) -> usize {
        let pairs = [
            self.mouth_corners,
            self.inner_brows,
            self.outer_brows,
            self.left_eye_corners,
            self.right_eye_corners,
            self.outer_eye_corners,
            self.face_height,
            self.jaw_width,
        ];
        self.left_eye
            .iter()
            .chain(self.right_eye.iter())
            .copied()
            .chain(pairs.iter().flat_map(|&(a, b)| [a, b]))
            .chain([self.upper_lip, self.lower_lip, self.jaw_bottom])
            .max()
            .unwrap_or(0)
    }

    /// Extract both eye sets. A side is `None` when any of its indices is missing.
    pub fn eye_landmarks(&self, frame: &LandmarkFrame) -> EyeLandmarks {
        EyeLandmarks::new(
            frame.select(&self.left_eye).ok(),
            frame.select(&self.right_eye).ok(),
        )
    }
}
