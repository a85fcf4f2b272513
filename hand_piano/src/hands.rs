//! Hand-landmark sources — simulated and (optionally) camera-backed.
//!
//! The public interface is a stream of [`HandFrame`]s delivered over a
//! `mpsc` channel.  Consumers don't need to know whether the frames came
//! from a real webcam or from the keyboard/mouse simulator; either way a
//! frame holds zero or more labelled hands, and zero detections is a
//! normal frame, never an error.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use piano_notes::{note_for, Finger, HandSide, REF_WIDTH};
use piano_session::FingerPos;

// ════════════════════════════════════════════════════════════════════════════
// HandFrame — one frame of observations
// ════════════════════════════════════════════════════════════════════════════

/// A 2D keypoint in normalized coordinates (0.0–1.0 of the frame).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Tip and base-joint landmarks for one finger.
#[derive(Clone, Copy, Debug)]
pub struct FingerLandmarks {
    pub tip:  Landmark,
    pub base: Landmark,
}

/// One detected hand: a side label plus per-finger landmarks.
#[derive(Clone, Debug)]
pub struct HandObservation {
    pub side:    HandSide,
    pub fingers: Vec<(Finger, FingerLandmarks)>,
}

/// Everything seen in one frame.  Recreated every frame, never persisted.
#[derive(Clone, Debug, Default)]
pub struct HandFrame {
    pub hands: Vec<HandObservation>,
}

impl HandFrame {
    /// Scale the normalized landmarks to pixel coordinates for the
    /// detectors.
    pub fn finger_positions(&self, frame_w: f32, frame_h: f32) -> Vec<FingerPos> {
        let mut out = Vec::new();
        for hand in &self.hands {
            for &(finger, lm) in &hand.fingers {
                out.push(FingerPos {
                    side:   hand.side,
                    finger,
                    tip_x:  lm.tip.x * frame_w,
                    tip_y:  lm.tip.y * frame_h,
                    base_y: lm.base.y * frame_h,
                });
            }
        }
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for camera and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug)]
pub enum SimInput {
    /// A finger key went down.
    KeyDown(HandSide, Finger),
    /// A finger key came back up.
    KeyUp(HandSide, Finger),
    /// Mouse position in normalized frame coordinates; steers the right
    /// index fingertip.
    MouseMove { x: f32, y: f32 },
    /// Left mouse button state; a held button presses the right index.
    MouseButton(bool),
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
///
/// Both hands are synthesized with each mapped fingertip hovering just
/// beside its note lane; a held key drops that fingertip below its base
/// joint and onto the lane, so the real press and hit detectors are
/// exercised unchanged.
pub struct SimHandSource {
    rx: Receiver<SimInput>,
}

/// Vertical position of the synthesized base joints (normalized).
const SIM_BASE_Y: f32 = 0.70;
/// Resting fingertip height, above the press threshold.
const SIM_REST_Y: f32 = 0.64;
/// Pressed fingertip height, below the base joint.
const SIM_PRESS_Y: f32 = 0.75;
/// Horizontal offset of a resting fingertip from its lane (normalized),
/// outside the hit radius so idle fingers cannot catch falling notes.
const SIM_REST_DX: f32 = 0.04;

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandSource { rx }
    }
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        let mut pressed: HashSet<(HandSide, Finger)> = HashSet::new();
        let mut mouse: Option<Landmark> = None;
        let mut mouse_down = false;

        for input in self.rx {
            match input {
                SimInput::KeyDown(side, finger) => { pressed.insert((side, finger)); }
                SimInput::KeyUp(side, finger)   => { pressed.remove(&(side, finger)); }
                SimInput::MouseMove { x, y }    => { mouse = Some(Landmark { x, y }); }
                SimInput::MouseButton(down)     => { mouse_down = down; }
            }
            let frame = synth_frame(&pressed, mouse, mouse_down);
            if tx.send(frame).is_err() {
                return;
            }
        }
    }
}

/// Build the simulated two-hand frame for the current input state.
fn synth_frame(
    pressed: &HashSet<(HandSide, Finger)>,
    mouse: Option<Landmark>,
    mouse_down: bool,
) -> HandFrame {
    let mut left  = HandObservation { side: HandSide::Left,  fingers: Vec::new() };
    let mut right = HandObservation { side: HandSide::Right, fingers: Vec::new() };

    for side in [HandSide::Left, HandSide::Right] {
        for finger in Finger::ALL {
            let Some(note) = note_for(side, finger) else { continue };
            let lane = note.lane_x(REF_WIDTH) / REF_WIDTH;

            let mut lm = if pressed.contains(&(side, finger)) {
                FingerLandmarks {
                    tip:  Landmark { x: lane, y: SIM_PRESS_Y },
                    base: Landmark { x: lane, y: SIM_BASE_Y },
                }
            } else {
                FingerLandmarks {
                    tip:  Landmark { x: lane + SIM_REST_DX, y: SIM_REST_Y },
                    base: Landmark { x: lane + SIM_REST_DX, y: SIM_BASE_Y },
                }
            };

            // The mouse steers the right index for free aiming; the base
            // joint follows so the button alone decides pressing.
            if side == HandSide::Right && finger == Finger::Index {
                if let Some(m) = mouse {
                    let base_y = if mouse_down { m.y - 0.05 } else { m.y + 0.05 };
                    lm = FingerLandmarks {
                        tip:  m,
                        base: Landmark { x: m.x, y: base_y },
                    };
                }
            }

            match side {
                HandSide::Left  => left.fingers.push((finger, lm)),
                HandSide::Right => right.fingers.push((finger, lm)),
            }
        }
    }

    HandFrame { hands: vec![left, right] }
}

// ════════════════════════════════════════════════════════════════════════════
// MediaPipe landmark indices (hand landmark model convention)
// ════════════════════════════════════════════════════════════════════════════

/// Tip and base-joint landmark indices for a finger, per the MediaPipe
/// 21-point hand model.
pub fn tip_base_indices(finger: Finger) -> (usize, usize) {
    match finger {
        Finger::Thumb  => (4, 2),
        Finger::Index  => (8, 5),
        Finger::Middle => (12, 9),
        Finger::Ring   => (16, 13),
        Finger::Pinky  => (20, 17),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MediaPipeHandSource — webcam via Python helper (feature = "mediapipe")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a Python helper process running MediaPipe.
///
/// The helper owns the webcam, prints `READY` once the model is loaded,
/// then emits one JSON line per captured frame:
///
/// ```text
/// {"hands":[{"handedness":"Left","score":0.97,
///            "landmarks":[{"x":0.1,"y":0.2,"z":0.0}, … 21 entries]}]}
/// ```
///
/// The preview is mirrored for the player, so x is flipped and the
/// handedness labels swapped on this side.  Malformed lines are logged
/// and the frame skipped; a helper that cannot start is fatal.
#[cfg(feature = "mediapipe")]
pub struct MediaPipeHandSource {
    process: std::process::Child,
    stdout:  std::io::BufReader<std::process::ChildStdout>,
}

#[cfg(feature = "mediapipe")]
mod wire {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct LandmarkJson {
        pub x: f32,
        pub y: f32,
        #[allow(dead_code)]
        pub z: f32,
    }

    #[derive(Deserialize, Debug)]
    pub struct HandJson {
        pub handedness: String,
        pub score:      f32,
        pub landmarks:  Vec<LandmarkJson>,
    }

    #[derive(Deserialize, Debug)]
    pub struct FrameJson {
        pub hands: Vec<HandJson>,
        #[serde(default)]
        pub error: Option<String>,
    }
}

#[cfg(feature = "mediapipe")]
impl MediaPipeHandSource {
    /// Minimum handedness score; weaker detections are dropped.
    const MIN_SCORE: f32 = 0.5;

    /// Start the helper and wait for its `READY` handshake.
    pub fn new() -> Result<Self, crate::error::AppError> {
        use crate::error::AppError;
        use std::io::BufRead;
        use std::process::{Command, Stdio};

        let script = std::env::current_dir()
            .map(|d| d.join("scripts/hand_landmarks.py"))
            .map_err(|e| AppError::HelperStart(e.to_string()))?;
        if !script.exists() {
            return Err(AppError::HelperStart(format!(
                "helper script not found at {} — run from the repository root",
                script.display()
            )));
        }

        log::info!("starting MediaPipe landmark helper…");
        let mut process = Command::new("python3")
            .arg(&script)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AppError::HelperStart(e.to_string()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| AppError::HelperStart("no stdout pipe".into()))?;
        let mut stdout = std::io::BufReader::new(stdout);

        let mut line = String::new();
        stdout
            .read_line(&mut line)
            .map_err(|e| AppError::HelperStart(e.to_string()))?;
        if line.trim() != "READY" {
            return Err(AppError::HelperStart(format!(
                "helper did not signal READY (got {:?}) — is the camera available?",
                line.trim()
            )));
        }

        log::info!("landmark helper ready");
        Ok(MediaPipeHandSource { process, stdout })
    }

    fn parse_frame(line: &str) -> Option<HandFrame> {
        let parsed: wire::FrameJson = match serde_json::from_str(line) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("skipping malformed landmark frame: {}", e);
                return None;
            }
        };
        if let Some(err) = parsed.error {
            log::warn!("landmark helper reported: {}", err);
            return Some(HandFrame::default());
        }

        let mut frame = HandFrame::default();
        for hand in parsed.hands {
            if hand.score < Self::MIN_SCORE || hand.landmarks.len() < 21 {
                continue;
            }
            // Mirrored view: flip x, swap the handedness label.
            let side = match hand.handedness.as_str() {
                "Left"  => HandSide::Right,
                "Right" => HandSide::Left,
                other   => {
                    log::warn!("unknown handedness label {:?}", other);
                    continue;
                }
            };
            let mut fingers = Vec::new();
            for finger in Finger::ALL {
                let (ti, bi) = tip_base_indices(finger);
                let tip  = &hand.landmarks[ti];
                let base = &hand.landmarks[bi];
                fingers.push((
                    finger,
                    FingerLandmarks {
                        tip:  Landmark { x: 1.0 - tip.x,  y: tip.y },
                        base: Landmark { x: 1.0 - base.x, y: base.y },
                    },
                ));
            }
            frame.hands.push(HandObservation { side, fingers });
        }
        Some(frame)
    }
}

#[cfg(feature = "mediapipe")]
impl HandSource for MediaPipeHandSource {
    fn run(mut self: Box<Self>, tx: Sender<HandFrame>) {
        use std::io::BufRead;

        let mut line = String::new();
        loop {
            line.clear();
            match self.stdout.read_line(&mut line) {
                Ok(0) => {
                    log::error!("landmark helper exited");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    // Skip this frame and retry on the next read.
                    log::warn!("landmark read error: {}", e);
                    continue;
                }
            }
            if let Some(frame) = Self::parse_frame(line.trim()) {
                if tx.send(frame).is_err() {
                    break;
                }
            }
        }
        let _ = self.process.kill();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use piano_session::PressTracker;

    #[test]
    fn synth_idle_frame_has_both_hands() {
        let frame = synth_frame(&HashSet::new(), None, false);
        assert_eq!(frame.hands.len(), 2);
        // Five mapped fingers on the left, three on the right.
        assert_eq!(frame.hands[0].fingers.len(), 5);
        assert_eq!(frame.hands[1].fingers.len(), 3);
    }

    #[test]
    fn idle_fingers_do_not_press() {
        let frame = synth_frame(&HashSet::new(), None, false);
        let fingers = frame.finger_positions(1280.0, 720.0);
        let mut tracker = PressTracker::new();
        assert!(tracker.update(&fingers, 720.0).is_empty());
    }

    #[test]
    fn key_press_edge_triggers_mapped_note() {
        let mut tracker = PressTracker::new();

        let idle = synth_frame(&HashSet::new(), None, false);
        tracker.update(&idle.finger_positions(1280.0, 720.0), 720.0);

        let mut pressed = HashSet::new();
        pressed.insert((HandSide::Left, Finger::Middle));
        let down = synth_frame(&pressed, None, false);
        let notes = tracker.update(&down.finger_positions(1280.0, 720.0), 720.0);
        assert_eq!(notes, vec![piano_notes::Note::E]);
    }

    #[test]
    fn pressed_fingertip_sits_on_its_lane() {
        let mut pressed = HashSet::new();
        pressed.insert((HandSide::Left, Finger::Pinky));
        let frame = synth_frame(&pressed, None, false);
        let fingers = frame.finger_positions(1280.0, 720.0);
        let pinky = fingers
            .iter()
            .find(|f| f.side == HandSide::Left && f.finger == Finger::Pinky)
            .unwrap();
        assert_eq!(pinky.tip_x, piano_notes::Note::C.lane_x(1280.0));
    }

    #[test]
    fn mouse_steers_right_index() {
        let mouse = Some(Landmark { x: 0.5, y: 0.5 });
        let frame = synth_frame(&HashSet::new(), mouse, false);
        let fingers = frame.finger_positions(1280.0, 720.0);
        let index = fingers
            .iter()
            .find(|f| f.side == HandSide::Right && f.finger == Finger::Index)
            .unwrap();
        assert_eq!(index.tip_x, 640.0);
        assert_eq!(index.tip_y, 360.0);
        // Button up: base below tip, no press.
        assert!(index.base_y > index.tip_y);
    }

    #[test]
    fn mouse_button_presses_right_index() {
        let mouse = Some(Landmark { x: 0.5, y: 0.5 });
        let down = synth_frame(&HashSet::new(), mouse, true);
        let mut tracker = PressTracker::new();
        let notes = tracker.update(&down.finger_positions(1280.0, 720.0), 720.0);
        assert_eq!(notes, vec![piano_notes::Note::B]);
    }

    #[test]
    fn sim_source_translates_inputs_to_frames() {
        let (in_tx, in_rx) = mpsc::channel();
        let frames = spawn_hand_source(SimHandSource::new(in_rx));

        in_tx.send(SimInput::KeyDown(HandSide::Left, Finger::Thumb)).unwrap();
        let frame = frames.recv().unwrap();
        let fingers = frame.finger_positions(1280.0, 720.0);
        let thumb = fingers
            .iter()
            .find(|f| f.side == HandSide::Left && f.finger == Finger::Thumb)
            .unwrap();
        assert!(thumb.tip_y > thumb.base_y);

        in_tx.send(SimInput::KeyUp(HandSide::Left, Finger::Thumb)).unwrap();
        let frame = frames.recv().unwrap();
        let fingers = frame.finger_positions(1280.0, 720.0);
        let thumb = fingers
            .iter()
            .find(|f| f.side == HandSide::Left && f.finger == Finger::Thumb)
            .unwrap();
        assert!(thumb.tip_y < thumb.base_y);
    }

    #[test]
    fn empty_frame_yields_no_positions() {
        let frame = HandFrame::default();
        assert!(frame.finger_positions(1280.0, 720.0).is_empty());
    }

    #[test]
    fn mediapipe_indices_match_hand_model() {
        assert_eq!(tip_base_indices(Finger::Thumb), (4, 2));
        assert_eq!(tip_base_indices(Finger::Index), (8, 5));
        assert_eq!(tip_base_indices(Finger::Pinky), (20, 17));
    }
}
