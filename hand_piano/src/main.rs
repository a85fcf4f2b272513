//! hand_piano — interactive entry point.

use std::io::{self, Write};
use std::path::PathBuf;

use hand_piano::app::{run, AppConfig, Mode};

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Hand Piano — play notes with your hands           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "mediapipe")]
    println!("  Mode: webcam hand tracking (MediaPipe helper)");
    #[cfg(not(feature = "mediapipe"))]
    println!("  Mode: keyboard/mouse simulation  (use --features mediapipe for a camera)");
    println!();

    let (mode, assets_dir) = parse_args();
    let cfg = AppConfig {
        mode: mode.unwrap_or_else(configure_interactively),
        assets_dir,
    };

    println!();
    println!("  Opening window…  (Escape exits at any point)");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// `--free` / `--game` skip the menu; `--assets DIR` overrides the sample
/// directory.
fn parse_args() -> (Option<Mode>, PathBuf) {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut mode = None;
    let mut assets_dir = AppConfig::default().assets_dir;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--free" => mode = Some(Mode::FreePlay),
            "--game" => mode = Some(Mode::Game),
            "--assets" => {
                if let Some(dir) = it.next() {
                    assets_dir = PathBuf::from(dir);
                }
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Usage: hand_piano [--free | --game] [--assets DIR]");
                std::process::exit(2);
            }
        }
    }

    (mode, assets_dir)
}

fn configure_interactively() -> Mode {
    println!("  1. Free play — every press gesture sounds its note");
    println!("  2. Game — catch the falling melody for score and combo");
    match read_line("  Choice (1–2, default 1): ").trim() {
        "2" => Mode::Game,
        _   => Mode::FreePlay,
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
