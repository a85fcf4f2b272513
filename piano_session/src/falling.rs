//! Falling-note scheduling and descent for the game mode.
//!
//! The scheduler is a pure function of (current time, last spawn time,
//! cursor): it is driven by whatever clock the caller passes in, which
//! keeps the game deterministic under test.

use piano_notes::Note;

/// Seconds between consecutive note spawns.
pub const SPAWN_INTERVAL: f64 = 1.0;

/// Default descent speed, px per frame.
pub const FALL_SPEED: f32 = 4.0;

// ════════════════════════════════════════════════════════════════════════════
// FallingNote
// ════════════════════════════════════════════════════════════════════════════

/// One note descending through its lane, waiting to be caught.
#[derive(Clone, Debug)]
pub struct FallingNote {
    pub note:  Note,
    pub x:     f32,
    pub y:     f32,
    pub speed: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// NoteField
// ════════════════════════════════════════════════════════════════════════════

/// The melody cursor plus every note currently in flight.
#[derive(Debug)]
pub struct NoteField {
    melody:      Vec<Note>,
    cursor:      usize,
    last_spawn:  Option<f64>,
    notes:       Vec<FallingNote>,
    frame_width: f32,
}

impl NoteField {
    pub fn new(melody: &[Note], frame_width: f32) -> Self {
        NoteField {
            melody: melody.to_vec(),
            cursor: 0,
            last_spawn: None,
            notes: Vec::new(),
            frame_width,
        }
    }

    /// Spawn at most one note: the first call spawns immediately, after
    /// which one note appears each [`SPAWN_INTERVAL`] until the melody is
    /// exhausted.  Returns the spawned note, if any.
    pub fn maybe_spawn(&mut self, now: f64) -> Option<Note> {
        if self.cursor >= self.melody.len() {
            return None;
        }
        let due = match self.last_spawn {
            None       => true,
            Some(last) => now - last > SPAWN_INTERVAL,
        };
        if !due {
            return None;
        }

        let note = self.melody[self.cursor];
        self.cursor += 1;
        self.last_spawn = Some(now);
        self.notes.push(FallingNote {
            note,
            x: note.lane_x(self.frame_width),
            y: 0.0,
            speed: FALL_SPEED,
        });
        Some(note)
    }

    /// Advance every note by its speed and silently drop the ones past the
    /// bottom edge (a miss carries no penalty).
    pub fn advance(&mut self, frame_height: f32) {
        for n in &mut self.notes {
            n.y += n.speed;
        }
        self.notes.retain(|n| n.y <= frame_height);
    }

    /// The notes currently in flight, for hit testing and rendering.
    pub fn active_notes(&self) -> &[FallingNote] {
        &self.notes
    }

    pub(crate) fn active_notes_mut(&mut self) -> &mut Vec<FallingNote> {
        &mut self.notes
    }

    /// Notes of the melody not yet spawned.
    pub fn remaining(&self) -> usize {
        self.melody.len() - self.cursor
    }

    /// The session ends once the whole melody has spawned and no note is
    /// left in flight.
    pub fn finished(&self) -> bool {
        self.cursor >= self.melody.len() && self.notes.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
