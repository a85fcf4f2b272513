//! Top-level application loop.
//!
//! One synchronous per-frame path: drain the freshest hand frame, update
//! the session, sound the returned notes, draw, present.  All session
//! state lives in explicit values owned here; time is a single `Instant`
//! taken at startup and handed to the session as seconds.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use piano_notes::melody;
use piano_session::{FreeSession, GameSession};

use crate::error::AppError;
use crate::hands::{spawn_hand_source, HandFrame};
use crate::sampler::NoteBank;
use crate::visualizer::{Visualizer, WIN_H, WIN_W};

/// Length of the pre-game countdown, seconds.
pub const COUNTDOWN_SECS: f64 = 3.0;
/// How long the final-score screen stays up, seconds.
pub const FINAL_SCREEN_SECS: f64 = 5.0;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Press gestures sound notes, no scoring.
    FreePlay,
    /// Catch the falling melody for score and combo.
    Game,
}

pub struct AppConfig {
    pub mode:       Mode,
    /// Directory holding the note samples (Do.mp3 … Do2.mp3).
    pub assets_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            mode:       Mode::FreePlay,
            assets_dir: PathBuf::from("assets/notes"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — entry point called from main.rs
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let (sim_tx, sim_rx) = mpsc::channel();
    let mut vis = Visualizer::new(sim_tx)?;
    let hand_rx = open_hand_source(sim_rx)?;
    let bank = NoteBank::load(&cfg.assets_dir);
    let start = Instant::now();

    match cfg.mode {
        Mode::FreePlay => run_free(&mut vis, &hand_rx, &bank, start),
        Mode::Game     => run_game(&mut vis, &hand_rx, &bank, start),
    }
}

/// Default build: the window's keyboard/mouse events drive a simulated
/// pair of hands.  With `--features mediapipe` a Python helper owns the
/// webcam instead; failure to start it is fatal here, before any window
/// loop runs.
#[cfg(not(feature = "mediapipe"))]
fn open_hand_source(
    sim_rx: Receiver<crate::hands::SimInput>,
) -> anyhow::Result<Receiver<HandFrame>> {
    Ok(spawn_hand_source(crate::hands::SimHandSource::new(sim_rx)))
}

#[cfg(feature = "mediapipe")]
fn open_hand_source(
    sim_rx: Receiver<crate::hands::SimInput>,
) -> anyhow::Result<Receiver<HandFrame>> {
    drop(sim_rx); // camera mode ignores window input events
    let source = crate::hands::MediaPipeHandSource::new()?;
    Ok(spawn_hand_source(source))
}

// ════════════════════════════════════════════════════════════════════════════
// Frame plumbing
// ════════════════════════════════════════════════════════════════════════════

/// Keep only the freshest hand frame; a frame that never arrives leaves
/// the previous one in place (a skipped capture is just retried next
/// iteration).
fn drain_latest(rx: &Receiver<HandFrame>, last: &mut HandFrame) -> Result<(), AppError> {
    loop {
        match rx.try_recv() {
            Ok(frame) => *last = frame,
            Err(TryRecvError::Empty) => return Ok(()),
            Err(TryRecvError::Disconnected) => return Err(AppError::HandSourceClosed),
        }
    }
}

/// Whole seconds left on the countdown clock, for the banner.
fn countdown_remaining(elapsed: f64) -> u32 {
    (COUNTDOWN_SECS - elapsed).ceil().max(0.0) as u32
}

// ════════════════════════════════════════════════════════════════════════════
// Free play
// ════════════════════════════════════════════════════════════════════════════

fn run_free(
    vis: &mut Visualizer,
    hand_rx: &Receiver<HandFrame>,
    bank: &NoteBank,
    _start: Instant,
) -> anyhow::Result<()> {
    let mut session = FreeSession::new(WIN_H as f32);
    let mut last = HandFrame::default();

    while vis.is_open() {
        if !vis.poll_input() {
            return Ok(());
        }
        drain_latest(hand_rx, &mut last)?;
        let fingers = last.finger_positions(WIN_W as f32, WIN_H as f32);

        for note in session.update(&fingers) {
            bank.trigger(note);
        }

        vis.clear();
        vis.draw_fingers(&fingers, &|side, finger| session.is_active(side, finger));
        vis.draw_free_hud();
        vis.present();
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Game mode: countdown → play → final screen
// ════════════════════════════════════════════════════════════════════════════

fn run_game(
    vis: &mut Visualizer,
    hand_rx: &Receiver<HandFrame>,
    bank: &NoteBank,
    start: Instant,
) -> anyhow::Result<()> {
    let mut last = HandFrame::default();

    // ── Countdown ─────────────────────────────────────────────────────────
    while start.elapsed().as_secs_f64() < COUNTDOWN_SECS {
        if !vis.poll_input() {
            return Ok(());
        }
        drain_latest(hand_rx, &mut last)?;
        vis.clear();
        vis.draw_countdown(countdown_remaining(start.elapsed().as_secs_f64()));
        vis.present();
    }

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut session = GameSession::new(melody(), WIN_W as f32, WIN_H as f32);
    let game_start = Instant::now();

    while vis.is_open() {
        if !vis.poll_input() {
            return Ok(());
        }
        drain_latest(hand_rx, &mut last)?;
        let fingers = last.finger_positions(WIN_W as f32, WIN_H as f32);
        let now = game_start.elapsed().as_secs_f64();

        for note in session.update(now, &fingers) {
            bank.trigger(note);
        }

        vis.clear();
        vis.draw_falling(session.field.active_notes());
        vis.draw_fingers(&fingers, &|_, _| false);
        vis.draw_particles(&session.particles, now);
        vis.draw_game_hud(session.board.score, session.board.combo,
                          session.field.remaining());
        vis.draw_combo_flash(session.board.combo, now);
        vis.present();

        if session.finished() {
            break;
        }
    }

    // ── Final screen ──────────────────────────────────────────────────────
    let final_start = Instant::now();
    while vis.is_open() && final_start.elapsed().as_secs_f64() < FINAL_SCREEN_SECS {
        if !vis.poll_input() {
            return Ok(());
        }
        drain_latest(hand_rx, &mut last).ok(); // score screen survives source loss
        vis.clear();
        vis.draw_final(session.board.score);
        vis.present();
    }

    log::info!("session over — final score {}", session.board.score);
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_free_play() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.mode, Mode::FreePlay);
        assert_eq!(cfg.assets_dir, PathBuf::from("assets/notes"));
    }

    #[test]
    fn countdown_counts_whole_seconds() {
        assert_eq!(countdown_remaining(0.0), 3);
        assert_eq!(countdown_remaining(0.2), 3);
        assert_eq!(countdown_remaining(1.1), 2);
        assert_eq!(countdown_remaining(2.9), 1);
        assert_eq!(countdown_remaining(3.5), 0);
    }

    #[test]
    fn drain_latest_keeps_freshest_frame() {
        let (tx, rx) = mpsc::channel();
        let mut last = HandFrame::default();

        tx.send(HandFrame::default()).unwrap();
        let mut newer = HandFrame::default();
        newer.hands.push(crate::hands::HandObservation {
            side: piano_notes::HandSide::Left,
            fingers: Vec::new(),
        });
        tx.send(newer).unwrap();

        drain_latest(&rx, &mut last).unwrap();
        assert_eq!(last.hands.len(), 1);
    }

    #[test]
    fn drain_latest_reports_closed_source() {
        let (tx, rx) = mpsc::channel::<HandFrame>();
        drop(tx);
        let mut last = HandFrame::default();
        assert!(matches!(
            drain_latest(&rx, &mut last),
            Err(AppError::HandSourceClosed)
        ));
    }

    #[test]
    fn empty_channel_keeps_previous_frame() {
        let (_tx, rx) = mpsc::channel::<HandFrame>();
        let mut last = HandFrame::default();
        last.hands.push(crate::hands::HandObservation {
            side: piano_notes::HandSide::Right,
            fingers: Vec::new(),
        });
        drain_latest(&rx, &mut last).unwrap();
        assert_eq!(last.hands.len(), 1);
    }
}
