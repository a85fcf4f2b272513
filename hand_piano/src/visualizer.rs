//! Software-rendered view using `minifb`.
//!
//! Layout (game mode):
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ SCORE 120   COMBO x3   NOTES 41         [combo pulse border] │
//! │        ○E            ○C      falling notes in their lanes    │
//! │                              particles on hits               │
//! │    ●C  ●D  ●E  ●F  ●G      ●A  ●B  ●C2   fingertip markers   │
//! │  C    D    E    F    G    A    B    C2   lane guides         │
//! │ ESC=EXIT  A S D F G H J K = FINGERS  MOUSE=B                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window doubles as the simulation input device: key and mouse
//! events are translated to [`SimInput`] and sent to the sim hand source.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use piano_notes::{Finger, HandSide, Note};
use piano_session::{FallingNote, FingerPos, ParticleField};

use crate::error::AppError;
use crate::hands::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1280;
pub const WIN_H: usize = 720;

const BG_COLOR:      u32 = 0xFF10_1018;
const LANE_COLOR:    u32 = 0xFF2A_2A3E;
const LANE_LABEL:    u32 = 0xFF55_5577;
const NOTE_COLOR:    u32 = 0xFF30_60FF;  // falling notes
const MARKER_IDLE:   u32 = 0xFF00_CC44;  // fingertip, resting
const MARKER_ACTIVE: u32 = 0xFFFF_3030;  // fingertip, pressing
const HUD_SCORE:     u32 = 0xFFFF_FF30;
const HUD_COMBO:     u32 = 0xFF40_FF40;
const HUD_TEXT:      u32 = 0xFFEE_EEEE;
const HUD_DIM:       u32 = 0xFF88_8888;
const COUNTDOWN:     u32 = 0xFFFF_FF30;
const FINAL_COLOR:   u32 = 0xFF40_FF40;

const NOTE_RADIUS:   usize = 15;
const MARKER_RADIUS: usize = 10;
const BORDER_PX:     usize = 10;

/// Keyboard row driving the eight mapped fingers in simulation mode.
const FINGER_KEYS: [(Key, HandSide, Finger); 8] = [
    (Key::A, HandSide::Left,  Finger::Pinky),
    (Key::S, HandSide::Left,  Finger::Ring),
    (Key::D, HandSide::Left,  Finger::Middle),
    (Key::F, HandSide::Left,  Finger::Index),
    (Key::G, HandSide::Left,  Finger::Thumb),
    (Key::H, HandSide::Right, Finger::Thumb),
    (Key::J, HandSide::Right, Finger::Index),
    (Key::K, HandSide::Right, Finger::Middle),
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    mouse_down: bool,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Hand Piano",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            mouse_down: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll window input, forward sim events.  Returns false when the app
    /// should exit (window closed or Escape pressed) — Escape aborts every
    /// phase, countdown and end screen included.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return false;
        }

        for (key, side, finger) in FINGER_KEYS {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                let _ = self.sim_tx.send(SimInput::KeyDown(side, finger));
            }
            if self.window.is_key_released(key) {
                let _ = self.sim_tx.send(SimInput::KeyUp(side, finger));
            }
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let _ = self.sim_tx.send(SimInput::MouseMove {
                x: mx / WIN_W as f32,
                y: my / WIN_H as f32,
            });
        }
        let down = self.window.get_mouse_down(MouseButton::Left);
        if down != self.mouse_down {
            self.mouse_down = down;
            let _ = self.sim_tx.send(SimInput::MouseButton(down));
        }

        true
    }

    /// Push the framebuffer to the screen.
    pub fn present(&mut self) {
        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Frame background ──────────────────────────────────────────────────

    /// Clear and draw the lane guides with their note labels.
    pub fn clear(&mut self) {
        self.buf.fill(BG_COLOR);
        for note in Note::ALL {
            let x = note.lane_x(WIN_W as f32) as usize;
            for y in 0..WIN_H - 40 {
                self.set_pixel(x, y, LANE_COLOR);
            }
            self.draw_text(note.label(), x.saturating_sub(4), WIN_H - 34, 2, LANE_LABEL);
        }
    }

    // ── Gameplay layers ───────────────────────────────────────────────────

    pub fn draw_fingers(
        &mut self,
        fingers: &[FingerPos],
        active: &dyn Fn(HandSide, Finger) -> bool,
    ) {
        for f in fingers {
            let Some(note) = piano_notes::note_for(f.side, f.finger) else { continue };
            let color = if active(f.side, f.finger) { MARKER_ACTIVE } else { MARKER_IDLE };
            let (x, y) = (f.tip_x as isize, f.tip_y as isize);
            self.fill_circle(x, y, MARKER_RADIUS, color);
            self.draw_text(
                note.label(),
                (x - 10).max(0) as usize,
                (y - 30).max(0) as usize,
                2,
                color,
            );
        }
    }

    pub fn draw_falling(&mut self, notes: &[FallingNote]) {
        for n in notes {
            let (x, y) = (n.x as isize, n.y as isize);
            self.fill_circle(x, y, NOTE_RADIUS, NOTE_COLOR);
            self.draw_text(
                n.note.label(),
                (x - 10).max(0) as usize,
                (y - 32).max(0) as usize,
                2,
                NOTE_COLOR,
            );
        }
    }

    pub fn draw_particles(&mut self, field: &ParticleField, now: f64) {
        for p in field.particles() {
            if let Some(r) = p.render_radius(now) {
                self.fill_circle(p.x as isize, p.y as isize, r as usize, p.color);
            }
        }
    }

    // ── HUD ───────────────────────────────────────────────────────────────

    pub fn draw_free_hud(&mut self) {
        self.draw_text("FREE PLAY", 10, 14, 3, HUD_SCORE);
        self.draw_text("A S D F G H J K = FINGERS  MOUSE = B  ESC = EXIT",
                       10, WIN_H - 16, 2, HUD_DIM);
    }

    pub fn draw_game_hud(&mut self, score: u32, combo: u32, remaining: usize) {
        self.draw_text(&format!("SCORE {}", score), 10, 14, 3, HUD_SCORE);
        self.draw_text(&format!("COMBO x{}", combo), 10, 44, 3, HUD_COMBO);
        self.draw_text(&format!("NOTES {}", remaining), 10, 74, 3, HUD_TEXT);
        self.draw_text("A S D F G H J K = FINGERS  MOUSE = B  ESC = EXIT",
                       10, WIN_H - 16, 2, HUD_DIM);
    }

    /// Pulsing full-frame border once a combo is running, plus the big
    /// banner from x3 up.  The colour oscillates with wall-clock time.
    pub fn draw_combo_flash(&mut self, combo: u32, now: f64) {
        if combo < 2 {
            return;
        }
        let color = combo_pulse_color(now);
        for i in 0..BORDER_PX {
            self.draw_border(i, i, WIN_W - 2 * i, WIN_H - 2 * i, color);
        }
        if combo >= 3 {
            let msg = format!("COMBO x{}!", combo);
            self.draw_text_centered(&msg, WIN_H / 2 - 100, 6, color);
        }
    }

    // ── Phase banners ─────────────────────────────────────────────────────

    pub fn draw_countdown(&mut self, seconds_left: u32) {
        let msg = format!("STARTING IN: {}", seconds_left);
        self.draw_text_centered(&msg, WIN_H / 2 - 20, 6, COUNTDOWN);
    }

    pub fn draw_final(&mut self, score: u32) {
        let msg = format!("WELL DONE! FINAL SCORE: {}", score);
        self.draw_text_centered(&msg, WIN_H / 2 - 20, 5, FINAL_COLOR);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn fill_circle(&mut self, cx: isize, cy: isize, r: usize, color: u32) {
        let r = r as isize;
        for dy in -r..=r {
            let half = ((r * r - dy * dy) as f32).sqrt() as isize;
            for dx in -half..=half {
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        for col in x..(x + w).min(WIN_W) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(WIN_H) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Scaled 3×5 bitmap text.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(cx + col * scale + sx,
                                               y + row * scale + sy, color);
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }

    fn draw_text_centered(&mut self, text: &str, y: usize, scale: usize, color: u32) {
        let width = text.chars().count() * 4 * scale;
        let x = WIN_W.saturating_sub(width) / 2;
        self.draw_text(text, x, y, scale, color);
    }
}

/// Border colour for the combo pulse: oscillates between warm and cool at
/// 5 rad/s of wall-clock time.
fn combo_pulse_color(now: f64) -> u32 {
    let pulse = (now * 5.0).sin().abs() as f32;
    let r = 128u32;
    let g = (255.0 * (1.0 - pulse)) as u32;
    let b = (255.0 * pulse) as u32;
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b010, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b110, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_color_is_opaque_and_oscillates() {
        let a = combo_pulse_color(0.0);
        let b = combo_pulse_color(0.3);
        assert_eq!(a >> 24, 0xFF);
        assert_eq!(b >> 24, 0xFF);
        assert_ne!(a, b);
    }

    #[test]
    fn every_finger_key_is_distinct() {
        for i in 0..FINGER_KEYS.len() {
            for j in i + 1..FINGER_KEYS.len() {
                assert_ne!(FINGER_KEYS[i].0, FINGER_KEYS[j].0);
                assert_ne!(
                    (FINGER_KEYS[i].1, FINGER_KEYS[i].2),
                    (FINGER_KEYS[j].1, FINGER_KEYS[j].2)
                );
            }
        }
    }

    #[test]
    fn finger_keys_cover_all_mapped_notes() {
        let mut notes: Vec<_> = FINGER_KEYS
            .iter()
            .filter_map(|&(_, side, finger)| piano_notes::note_for(side, finger))
            .collect();
        notes.sort();
        notes.dedup();
        assert_eq!(notes.len(), Note::ALL.len());
    }

    #[test]
    fn glyphs_fit_three_columns() {
        for c in "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ:!=-. ".chars() {
            for row in char_glyph(c) {
                assert!(row <= 0b111);
            }
        }
    }
}
