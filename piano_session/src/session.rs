//! Free-play and game session state.
//!
//! A session is the single owner of all mutable per-round state; the app
//! calls `update` once per frame with the current time and the frame's
//! finger observations, and sounds whatever notes come back.

use piano_notes::{note_for, Finger, HandSide, Note};

use crate::{FingerPos, NoteField, ParticleField, PressTracker, ScoreBoard};

/// Fingertip-to-falling-note distance (px) that registers a hit.
pub const HIT_RADIUS: f32 = 25.0;

/// Burst colour for hit particles (yellow).
pub const BURST_COLOR: u32 = 0xFFFF_FF00;

// ════════════════════════════════════════════════════════════════════════════
// FreeSession
// ════════════════════════════════════════════════════════════════════════════

/// Free play: every press gesture sounds its mapped note, no scoring.
#[derive(Debug)]
pub struct FreeSession {
    tracker:      PressTracker,
    frame_height: f32,
}

impl FreeSession {
    pub fn new(frame_height: f32) -> Self {
        FreeSession {
            tracker: PressTracker::new(),
            frame_height,
        }
    }

    /// Returns the notes whose press edge fired this frame.
    pub fn update(&mut self, fingers: &[FingerPos]) -> Vec<Note> {
        self.tracker.update(fingers, self.frame_height)
    }

    pub fn is_active(&self, side: HandSide, finger: Finger) -> bool {
        self.tracker.is_active(side, finger)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GameSession
// ════════════════════════════════════════════════════════════════════════════

/// The falling-note game: spawner, hit tests, score/combo and particles.
#[derive(Debug)]
pub struct GameSession {
    pub field:     NoteField,
    pub board:     ScoreBoard,
    pub particles: ParticleField,
    frame_height:  f32,
}

impl GameSession {
    pub fn new(melody: &[Note], frame_width: f32, frame_height: f32) -> Self {
        GameSession {
            field: NoteField::new(melody, frame_width),
            board: ScoreBoard::new(),
            particles: ParticleField::new(),
            frame_height,
        }
    }

    /// Run one frame: spawn, descend, hit-test every finger against the
    /// matching falling notes, then tick the particles.  Returns one note
    /// per registered hit (simultaneous hits all score independently).
    pub fn update(&mut self, now: f64, fingers: &[FingerPos]) -> Vec<Note> {
        self.field.maybe_spawn(now);
        self.field.advance(self.frame_height);

        let mut hits = Vec::new();
        let GameSession { field, board, particles, .. } = self;

        for f in fingers {
            let Some(assigned) = note_for(f.side, f.finger) else { continue };

            field.active_notes_mut().retain(|fnote| {
                if fnote.note != assigned {
                    return true;
                }
                let dist = (fnote.x - f.tip_x).hypot(fnote.y - f.tip_y);
                if dist >= HIT_RADIUS {
                    return true;
                }
                board.register_hit(now);
                particles.burst(f.tip_x, f.tip_y, BURST_COLOR, now);
                hits.push(assigned);
                false
            });
        }

        self.particles.tick(now);
        hits
    }

    /// True once the whole melody has spawned and no note is in flight.
    pub fn finished(&self) -> bool {
        self.field.finished()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
