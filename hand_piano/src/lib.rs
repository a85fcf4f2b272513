//! # hand_piano
//!
//! An interactive virtual piano played with bare hands in front of a
//! webcam, plus a falling-note catch game with score, combo and particle
//! bursts.
//!
//! ## Finger → note mapping
//!
//! | Hand | Finger | Note |
//! |---|---|---|
//! | Left | Pinky | C |
//! | Left | Ring | D |
//! | Left | Middle | E |
//! | Left | Index | F |
//! | Left | Thumb | G |
//! | Right | Thumb | A |
//! | Right | Index | B |
//! | Right | Middle | C2 |
//!
//! In free play a note sounds when a fingertip dips below its base joint
//! (a downward press gesture, edge-triggered).  In game mode, notes fall
//! down their lanes and are caught by bringing the matching fingertip
//! within reach; quick successive catches build a combo multiplier.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the keyboard plays the fingers and
//!   the mouse steers the right index fingertip.  No camera needed.
//! * `mediapipe` — **Camera mode**: a Python helper owns the webcam, runs
//!   MediaPipe hand landmarking and streams landmarks to this process.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Finger | Note |
//! |---|---|---|
//! | `A` | Left pinky | C |
//! | `S` | Left ring | D |
//! | `D` | Left middle | E |
//! | `F` | Left index | F |
//! | `G` | Left thumb | G |
//! | `H` | Right thumb | A |
//! | `J` | Right index | B |
//! | `K` | Right middle | C2 |
//! | Mouse / left button | Right index | B |
//! | `Escape` | Quit | |

pub mod app;
pub mod error;
pub mod hands;
pub mod sampler;
pub mod visualizer;
