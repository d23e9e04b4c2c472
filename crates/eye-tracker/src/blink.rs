//! Blink detection state machine
//!
//! ```text
//!            ear < t                 frames >= min
//!   Open ───────────▶ BelowThreshold ───────────▶ Blinking
//!    ▲                     │                         │
//!    │   ear >= t (noise)  │        ear >= t         │
//!    ├─────────────────────┘   (emits BlinkEvent)    │
//!    └───────────────────────────────────────────────┘
//! ```
//!
//! A closure that never reopens stays in `Blinking` and is never recorded.

use serde::{Deserialize, Serialize};

/// Duration class of a completed blink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkKind {
    /// Shorter than the rapid-blink limit
    Rapid,
    #[default]
    Normal,
    /// Longer than the prolonged-closure limit
    Prolonged,
}

impl BlinkKind {
    /// Classify a blink duration (seconds)
    pub fn classify(duration_s: f64, rapid_below_s: f64, prolonged_above_s: f64) -> Self {
        if duration_s < rapid_below_s {
            BlinkKind::Rapid
        } else if duration_s > prolonged_above_s {
            BlinkKind::Prolonged
        } else {
            BlinkKind::Normal
        }
    }
}

/// A completed blink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkEvent {
    /// Time the closure was confirmed (seconds)
    pub start_time: f64,
    /// Time the eyes reopened (seconds)
    pub end_time: f64,
    /// `end_time - start_time`
    pub duration: f64,
    /// Lowest EAR seen during the closure
    pub min_ear: f64,
    /// Number of closed frames
    pub frames: u32,
    pub kind: BlinkKind,
}

/// Blink detector state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BlinkState {
    /// Eyes open
    #[default]
    Open,
    /// Closed for fewer frames than needed to confirm a blink
    BelowThreshold { frames: u32, min_ear: f64 },
    /// Confirmed closure, waiting for the eyes to reopen
    Blinking {
        start_time: f64,
        frames: u32,
        min_ear: f64,
    },
}

/// Parameters for a single state transition
#[derive(Debug, Clone, Copy)]
pub struct BlinkParams {
    pub ear_threshold: f64,
    pub min_consecutive_frames: u32,
    pub rapid_blink_s: f64,
    pub prolonged_blink_s: f64,
}

impl BlinkState {
    pub fn is_blinking(&self) -> bool {
        matches!(self, BlinkState::Blinking { .. })
    }

    /// Consecutive below-threshold frames in the current closure
    pub fn closed_frames(&self) -> u32 {
        match self {
            BlinkState::Open => 0,
            BlinkState::BelowThreshold { frames, .. } | BlinkState::Blinking { frames, .. } => {
                *frames
            }
        }
    }

    /// Advance by one frame. Returns the next state and the blink that
    /// completed on this frame, if any.
    pub fn next(self, ear: f64, timestamp: f64, params: &BlinkParams) -> (BlinkState, Option<BlinkEvent>) {
        let min_frames = params.min_consecutive_frames.max(1);

        if ear < params.ear_threshold {
            let next = match self {
                BlinkState::Open => Self::confirm(1, ear, timestamp, min_frames),
                BlinkState::BelowThreshold { frames, min_ear } => {
                    Self::confirm(frames + 1, min_ear.min(ear), timestamp, min_frames)
                }
                BlinkState::Blinking {
                    start_time,
                    frames,
                    min_ear,
                } => BlinkState::Blinking {
                    start_time,
                    frames: frames.saturating_add(1),
                    min_ear: min_ear.min(ear),
                },
            };
            return (next, None);
        }

        match self {
            BlinkState::Blinking {
                start_time,
                frames,
                min_ear,
            } => {
                let duration = (timestamp - start_time).max(0.0);
                let event = BlinkEvent {
                    start_time,
                    end_time: timestamp,
                    duration,
                    min_ear,
                    frames,
                    kind: BlinkKind::classify(duration, params.rapid_blink_s, params.prolonged_blink_s),
                };
                (BlinkState::Open, Some(event))
            }
            _ => (BlinkState::Open, None),
        }
    }

    fn confirm(frames: u32, min_ear: f64, timestamp: f64, min_frames: u32) -> BlinkState {
        if frames >= min_frames {
            BlinkState::Blinking {
                start_time: timestamp,
                frames,
                min_ear,
            }
        } else {
            BlinkState::BelowThreshold { frames, min_ear }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: BlinkParams = BlinkParams {
        ear_threshold: 0.25,
        min_consecutive_frames: 3,
        rapid_blink_s: 0.1,
        prolonged_blink_s: 0.5,
    };

    fn run(ears: &[f64], dt: f64) -> (BlinkState, Vec<BlinkEvent>) {
        let mut state = BlinkState::Open;
        let mut events = Vec::new();
        for (i, &ear) in ears.iter().enumerate() {
            let (next, event) = state.next(ear, i as f64 * dt, &PARAMS);
            state = next;
            events.extend(event);
        }
        (state, events)
    }

    #[test]
    fn test_open_to_below_threshold() {
        let (state, event) = BlinkState::Open.next(0.1, 0.0, &PARAMS);
        assert_eq!(state, BlinkState::BelowThreshold { frames: 1, min_ear: 0.1 });
        assert!(event.is_none());
    }

    #[test]
    fn test_confirmed_on_min_frames() {
        let (state, events) = run(&[0.1, 0.12, 0.08], 0.1);
        assert_eq!(
            state,
            BlinkState::Blinking {
                start_time: 0.2,
                frames: 3,
                min_ear: 0.08
            }
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_noise_dip_emits_nothing() {
        let (state, events) = run(&[0.1, 0.1, 0.3], 0.1);
        assert_eq!(state, BlinkState::Open);
        assert!(events.is_empty());
    }

    #[test]
    fn test_reopen_emits_event() {
        let (state, events) = run(&[0.3, 0.1, 0.1, 0.05, 0.1, 0.3], 0.1);
        assert_eq!(state, BlinkState::Open);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        // Confirmed at frame 3 (t=0.3), reopened at frame 5 (t=0.5)
        assert!((event.start_time - 0.3).abs() < 1e-9);
        assert!((event.end_time - 0.5).abs() < 1e-9);
        assert!((event.duration - 0.2).abs() < 1e-9);
        assert_eq!(event.min_ear, 0.05);
        assert_eq!(event.frames, 4);
        assert_eq!(event.kind, BlinkKind::Normal);
    }

    #[test]
    fn test_sustained_closure_never_finalized() {
        let ears = vec![0.05; 500];
        let (state, events) = run(&ears, 1.0 / 30.0);
        assert!(state.is_blinking());
        assert_eq!(state.closed_frames(), 500);
        assert!(events.is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // EAR equal to the threshold counts as open
        let (state, _) = BlinkState::Open.next(0.25, 0.0, &PARAMS);
        assert_eq!(state, BlinkState::Open);
    }

    #[test]
    fn test_classify() {
        assert_eq!(BlinkKind::classify(0.05, 0.1, 0.5), BlinkKind::Rapid);
        assert_eq!(BlinkKind::classify(0.1, 0.1, 0.5), BlinkKind::Normal);
        assert_eq!(BlinkKind::classify(0.5, 0.1, 0.5), BlinkKind::Normal);
        assert_eq!(BlinkKind::classify(0.75, 0.1, 0.5), BlinkKind::Prolonged);
    }
}
