//! Edge-triggered press detection for free play.
//!
//! A finger counts as "pressing" when its tip has moved below a threshold
//! derived from its base joint.  A note sounds only on the transition from
//! not-pressing to pressing; holding the finger down retriggers nothing,
//! and lifting it re-arms the finger.

use std::collections::HashMap;

use piano_notes::{note_for, Finger, HandSide, Note};

use crate::FingerPos;

/// Activation offset below the base joint, in px at the reference frame
/// height of 720 px.  Scaled proportionally for other resolutions.
pub const THRESHOLD_OFFSET: f32 = 15.0;

/// Reference frame height (px) for [`THRESHOLD_OFFSET`].
pub const REF_HEIGHT: f32 = 720.0;

// ════════════════════════════════════════════════════════════════════════════
// PressTracker
// ════════════════════════════════════════════════════════════════════════════

/// Per-finger press state across frames.
///
/// State is keyed by `(HandSide, Finger)` rather than by note, so two
/// hands mapped to the same note cannot suppress each other.  Notes are
/// aggregated only at the trigger-decision step: if several fingers cross
/// into "pressing" on the same note within one frame, the note is
/// returned once.
#[derive(Debug, Default)]
pub struct PressTracker {
    active: HashMap<(HandSide, Finger), bool>,
}

impl PressTracker {
    pub fn new() -> Self {
        PressTracker::default()
    }

    /// Process one frame of finger observations and return the notes whose
    /// press edge fired this frame.
    ///
    /// Fingers absent from `fingers` keep their previous state, so a hand
    /// briefly lost by the tracker neither releases nor retriggers.
    pub fn update(&mut self, fingers: &[FingerPos], frame_height: f32) -> Vec<Note> {
        let offset = THRESHOLD_OFFSET * frame_height / REF_HEIGHT;
        let mut triggered = Vec::new();

        for f in fingers {
            let Some(note) = note_for(f.side, f.finger) else { continue };

            let threshold = f.base_y - offset;
            let pressing  = f.tip_y > threshold;

            let was = self
                .active
                .insert((f.side, f.finger), pressing)
                .unwrap_or(false);

            if pressing && !was && !triggered.contains(&note) {
                triggered.push(note);
            }
        }

        triggered
    }

    /// Whether a finger is currently past its press threshold.
    /// Used by the renderer to colour fingertip markers.
    pub fn is_active(&self, side: HandSide, finger: Finger) -> bool {
        self.active.get(&(side, finger)).copied().unwrap_or(false)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn finger(side: HandSide, finger: Finger, tip_y: f32, base_y: f32) -> FingerPos {
        FingerPos { side, finger, tip_x: 0.0, tip_y, base_y }
    }

    const H: f32 = 720.0;

    #[test]
    fn crossing_threshold_triggers_once() {
        let mut t = PressTracker::new();
        // tip above threshold: 400 - 15 = 385, tip_y 300 < 385 → inactive
        let up   = [finger(HandSide::Left, Finger::Index, 300.0, 400.0)];
        let down = [finger(HandSide::Left, Finger::Index, 420.0, 400.0)];

        assert!(t.update(&up, H).is_empty());
        assert_eq!(t.update(&down, H), vec![Note::F]);
    }

    #[test]
    fn holding_does_not_retrigger() {
        let mut t = PressTracker::new();
        let down = [finger(HandSide::Left, Finger::Index, 420.0, 400.0)];
        assert_eq!(t.update(&down, H), vec![Note::F]);
        for _ in 0..10 {
            assert!(t.update(&down, H).is_empty());
        }
    }

    #[test]
    fn release_rearms_the_finger() {
        let mut t = PressTracker::new();
        let up   = [finger(HandSide::Left, Finger::Thumb, 300.0, 400.0)];
        let down = [finger(HandSide::Left, Finger::Thumb, 420.0, 400.0)];

        assert_eq!(t.update(&down, H), vec![Note::G]);
        assert!(t.update(&up, H).is_empty());
        assert_eq!(t.update(&down, H), vec![Note::G]);
    }

    #[test]
    fn exactly_at_threshold_is_inactive() {
        let mut t = PressTracker::new();
        // threshold = 400 - 15 = 385; tip_y == threshold must not press
        let at = [finger(HandSide::Left, Finger::Middle, 385.0, 400.0)];
        assert!(t.update(&at, H).is_empty());
        assert!(!t.is_active(HandSide::Left, Finger::Middle));
    }

    #[test]
    fn unmapped_finger_never_triggers() {
        let mut t = PressTracker::new();
        let down = [finger(HandSide::Right, Finger::Pinky, 500.0, 400.0)];
        assert!(t.update(&down, H).is_empty());
    }

    #[test]
    fn duplicate_edges_on_one_note_trigger_once() {
        // Defensive: no note is double-mapped today, but simultaneous
        // edges on one note must collapse to a single trigger.
        let mut t = PressTracker::new();
        let both = [
            finger(HandSide::Left, Finger::Index, 420.0, 400.0),
            finger(HandSide::Left, Finger::Index, 430.0, 400.0),
        ];
        assert_eq!(t.update(&both, H), vec![Note::F]);
    }

    #[test]
    fn hands_tracked_independently() {
        let mut t = PressTracker::new();
        let left  = [finger(HandSide::Left,  Finger::Thumb, 420.0, 400.0)];
        let right = [finger(HandSide::Right, Finger::Thumb, 420.0, 400.0)];

        assert_eq!(t.update(&left, H),  vec![Note::G]);
        // The left thumb being held must not suppress the right thumb.
        assert_eq!(t.update(&right, H), vec![Note::A]);
        assert!(t.is_active(HandSide::Left, Finger::Thumb));
        assert!(t.is_active(HandSide::Right, Finger::Thumb));
    }

    #[test]
    fn missing_finger_keeps_state() {
        let mut t = PressTracker::new();
        let down = [finger(HandSide::Left, Finger::Ring, 420.0, 400.0)];
        t.update(&down, H);
        // Hand disappears for a frame; state persists, no retrigger after.
        t.update(&[], H);
        assert!(t.is_active(HandSide::Left, Finger::Ring));
        assert!(t.update(&down, H).is_empty());
    }

    #[test]
    fn offset_scales_with_resolution() {
        let mut t = PressTracker::new();
        // At 360 px height the offset halves to 7.5: tip 10 px below the
        // base is a press there.
        let down = [finger(HandSide::Left, Finger::Index, 210.0, 200.0)];
        assert_eq!(t.update(&down, 360.0), vec![Note::F]);
    }
}
