//! # piano_notes
//!
//! The fixed musical vocabulary of the hand piano: the eight playable
//! [`Note`]s, the [`Finger`]/[`HandSide`] naming used by the landmark
//! sources, the side-dependent finger→note mapping, per-note lane
//! positions for the falling-note game, and the built-in melody.
//!
//! Everything here is pure data — no I/O, no state, no errors.
//!
//! ## Quick start
//!
//! ```rust
//! use piano_notes::{note_for, Finger, HandSide, Note};
//!
//! assert_eq!(note_for(HandSide::Left, Finger::Pinky), Some(Note::C));
//! assert_eq!(note_for(HandSide::Right, Finger::Pinky), None);
//! assert_eq!(Note::C.lane_x(1280.0), 100.0);
//! ```

// ════════════════════════════════════════════════════════════════════════════
// Note — the eight playable notes
// ════════════════════════════════════════════════════════════════════════════

/// Reference frame width (px) at which the lane positions below are defined.
pub const REF_WIDTH: f32 = 1280.0;

/// One of the eight playable notes: the seven naturals plus the octave
/// repeat of C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
    /// C one octave above [`Note::C`].
    C2,
}

impl Note {
    /// All notes, in ascending pitch order.
    pub const ALL: [Note; 8] = [
        Note::C, Note::D, Note::E, Note::F,
        Note::G, Note::A, Note::B, Note::C2,
    ];

    /// Display label drawn next to fingertips and falling notes.
    pub fn label(self) -> &'static str {
        match self {
            Note::C  => "C",
            Note::D  => "D",
            Note::E  => "E",
            Note::F  => "F",
            Note::G  => "G",
            Note::A  => "A",
            Note::B  => "B",
            Note::C2 => "C2",
        }
    }

    /// Audio asset file name for this note (solfège, as shipped with the
    /// original sample set).
    pub fn asset_file(self) -> &'static str {
        match self {
            Note::C  => "Do.mp3",
            Note::D  => "Re.mp3",
            Note::E  => "Mi.mp3",
            Note::F  => "Fa.mp3",
            Note::G  => "Sol.mp3",
            Note::A  => "La.mp3",
            Note::B  => "Si.mp3",
            Note::C2 => "Do2.mp3",
        }
    }

    /// Horizontal lane centre (px) for the falling-note game, scaled to
    /// `frame_width`.  The lanes are fixed per note; at the reference
    /// width of 1280 px they sit at 100, 250, …, 1150.
    pub fn lane_x(self, frame_width: f32) -> f32 {
        let reference = match self {
            Note::C  => 100.0,
            Note::D  => 250.0,
            Note::E  => 400.0,
            Note::F  => 550.0,
            Note::G  => 700.0,
            Note::A  => 850.0,
            Note::B  => 1000.0,
            Note::C2 => 1150.0,
        };
        reference * frame_width / REF_WIDTH
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSide / Finger
// ════════════════════════════════════════════════════════════════════════════

/// Which hand an observation belongs to, as labelled by the landmark source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

/// Named finger of a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];
}

// ════════════════════════════════════════════════════════════════════════════
// Finger → note mapping
// ════════════════════════════════════════════════════════════════════════════

/// Static side-dependent mapping from finger to note.
///
/// Left hand plays the lower five notes pinky-to-thumb; the right hand
/// continues upward on thumb, index and middle.  Unmapped fingers return
/// `None` and produce no sound.
pub fn note_for(side: HandSide, finger: Finger) -> Option<Note> {
    match (side, finger) {
        (HandSide::Left,  Finger::Pinky)  => Some(Note::C),
        (HandSide::Left,  Finger::Ring)   => Some(Note::D),
        (HandSide::Left,  Finger::Middle) => Some(Note::E),
        (HandSide::Left,  Finger::Index)  => Some(Note::F),
        (HandSide::Left,  Finger::Thumb)  => Some(Note::G),
        (HandSide::Right, Finger::Thumb)  => Some(Note::A),
        (HandSide::Right, Finger::Index)  => Some(Note::B),
        (HandSide::Right, Finger::Middle) => Some(Note::C2),
        _ => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Built-in melody
// ════════════════════════════════════════════════════════════════════════════

/// The fixed melody played by the falling-note game ("Ode to Joy").
pub fn melody() -> &'static [Note] {
    use Note::*;
    const MELODY: [Note; 62] = [
        E, E, F, G, G, F, E, D, C, C, D, E, E, D, D,
        E, E, F, G, G, F, E, D, C, C, D, E, D, C, C,
        D, D, E, C, D, E, F, E, C, D, E, F, E, D,
        C, D, G, E, E, F, G, G, F, E, D, C, C, D, E, D, C, C,
    ];
    &MELODY
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_hand_covers_low_five() {
        assert_eq!(note_for(HandSide::Left, Finger::Pinky),  Some(Note::C));
        assert_eq!(note_for(HandSide::Left, Finger::Ring),   Some(Note::D));
        assert_eq!(note_for(HandSide::Left, Finger::Middle), Some(Note::E));
        assert_eq!(note_for(HandSide::Left, Finger::Index),  Some(Note::F));
        assert_eq!(note_for(HandSide::Left, Finger::Thumb),  Some(Note::G));
    }

    #[test]
    fn right_hand_covers_high_three() {
        assert_eq!(note_for(HandSide::Right, Finger::Thumb),  Some(Note::A));
        assert_eq!(note_for(HandSide::Right, Finger::Index),  Some(Note::B));
        assert_eq!(note_for(HandSide::Right, Finger::Middle), Some(Note::C2));
    }

    #[test]
    fn unmapped_fingers_are_silent() {
        assert_eq!(note_for(HandSide::Right, Finger::Ring),  None);
        assert_eq!(note_for(HandSide::Right, Finger::Pinky), None);
    }

    #[test]
    fn every_note_reachable_by_exactly_one_finger() {
        for note in Note::ALL {
            let mut count = 0;
            for side in [HandSide::Left, HandSide::Right] {
                for finger in Finger::ALL {
                    if note_for(side, finger) == Some(note) {
                        count += 1;
                    }
                }
            }
            assert_eq!(count, 1, "{:?} should have one finger", note);
        }
    }

    #[test]
    fn lanes_ascend_left_to_right() {
        let xs: Vec<f32> = Note::ALL.iter().map(|n| n.lane_x(1280.0)).collect();
        for pair in xs.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn lanes_scale_with_width() {
        assert_eq!(Note::C.lane_x(1280.0), 100.0);
        assert_eq!(Note::C.lane_x(640.0),  50.0);
        assert_eq!(Note::C2.lane_x(1280.0), 1150.0);
    }

    #[test]
    fn melody_uses_only_left_hand_range() {
        // The built-in melody stays within C–G so it is playable with
        // one hand.
        for &n in melody() {
            assert!(matches!(n, Note::C | Note::D | Note::E | Note::F | Note::G));
        }
    }

    #[test]
    fn melody_length() {
        assert_eq!(melody().len(), 62);
    }
}
