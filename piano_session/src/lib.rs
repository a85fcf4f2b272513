//! # piano_session
//!
//! Deterministic per-frame logic for the hand piano: edge-triggered press
//! detection for free play, the falling-note game (time-driven spawner,
//! fingertip hit tests, score/combo), and the particle bursts drawn on
//! hits.
//!
//! Every API that depends on time takes an explicit `now` in seconds, so
//! the whole crate can be driven by a synthetic clock in tests.  No I/O
//! happens here; sessions return the [`Note`](piano_notes::Note)s the
//! caller should sound, and expose their visual state for the renderer.
//!
//! ## Quick start
//!
//! ```rust
//! use piano_notes::melody;
//! use piano_session::{FingerPos, GameSession};
//!
//! let mut game = GameSession::new(melody(), 1280.0, 720.0);
//! let fingers: [FingerPos; 0] = [];
//! let to_play = game.update(0.0, &fingers);
//! assert!(to_play.is_empty());
//! assert_eq!(game.field.active_notes().len(), 1); // first note spawned
//! ```

pub mod falling;
pub mod particles;
pub mod press;
pub mod score;
pub mod session;

pub use falling::{FallingNote, NoteField, FALL_SPEED, SPAWN_INTERVAL};
pub use particles::{Particle, ParticleField, BURST_COUNT};
pub use press::{PressTracker, THRESHOLD_OFFSET};
pub use score::{ScoreBoard, COMBO_WINDOW};
pub use session::{FreeSession, GameSession, HIT_RADIUS};

use piano_notes::{Finger, HandSide};

/// One tracked finger in frame pixel coordinates, as delivered by a hand
/// source for a single frame.
///
/// `base_y` is the vertical position of the finger's base joint; press
/// detection compares the tip against a threshold derived from it.
#[derive(Clone, Copy, Debug)]
pub struct FingerPos {
    pub side:   HandSide,
    pub finger: Finger,
    pub tip_x:  f32,
    pub tip_y:  f32,
    pub base_y: f32,
}
