//! The note bank: audio assets loaded at startup, triggered fire-and-forget.
//!
//! Playback must never block the frame loop, so every trigger decodes its
//! sample into a fresh detached sink.  Missing or undecodable assets are
//! logged once at load time and the note simply stays silent; a machine
//! with no audio device degrades to a null output the same way.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use piano_notes::Note;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

// ════════════════════════════════════════════════════════════════════════════
// SampleOut — abstraction over rodio / null (for headless machines)
// ════════════════════════════════════════════════════════════════════════════

trait SampleOut {
    fn play(&self, data: Arc<[u8]>);
}

// ── rodio backend ─────────────────────────────────────────────────────────

struct RodioOut {
    // The stream must outlive every sink attached to its handle.
    _stream: OutputStream,
    handle:  OutputStreamHandle,
}

impl SampleOut for RodioOut {
    fn play(&self, data: Arc<[u8]>) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        let Ok(source) = Decoder::new(Cursor::new(data)) else {
            return;
        };
        sink.append(source);
        sink.detach();
    }
}

// ── null backend (no audio device) ────────────────────────────────────────

struct NullOut;

impl SampleOut for NullOut {
    fn play(&self, _data: Arc<[u8]>) {}
}

fn open_audio_output() -> Box<dyn SampleOut> {
    match OutputStream::try_default() {
        Ok((stream, handle)) => Box::new(RodioOut { _stream: stream, handle }),
        Err(e) => {
            log::warn!("no audio output device ({}) — running silent", e);
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NoteBank
// ════════════════════════════════════════════════════════════════════════════

/// All loaded note samples plus the output they play through.
pub struct NoteBank {
    samples: HashMap<Note, Arc<[u8]>>,
    out:     Box<dyn SampleOut>,
}

impl NoteBank {
    /// Load every note's asset from `dir`.  Notes whose file is missing or
    /// undecodable are logged and left inert.
    pub fn load(dir: &Path) -> Self {
        let mut samples = HashMap::new();
        for note in Note::ALL {
            let path = dir.join(note.asset_file());
            let data: Arc<[u8]> = match std::fs::read(&path) {
                Ok(bytes) => Arc::from(bytes.into_boxed_slice()),
                Err(e) => {
                    log::warn!("{}: {} — {:?} will be silent", path.display(), e, note);
                    continue;
                }
            };
            // Catch undecodable files at load time rather than mid-game.
            if Decoder::new(Cursor::new(data.clone())).is_err() {
                log::warn!("{}: not a decodable audio file — {:?} will be silent",
                           path.display(), note);
                continue;
            }
            samples.insert(note, data);
        }
        log::info!("note bank: {}/{} samples loaded from {}",
                   samples.len(), Note::ALL.len(), dir.display());
        NoteBank {
            samples,
            out: open_audio_output(),
        }
    }

    /// Fire-and-forget playback; inert notes are a silent no-op.
    pub fn trigger(&self, note: Note) {
        if let Some(data) = self.samples.get(&note) {
            self.out.play(data.clone());
        }
    }

    /// How many notes have a playable sample.
    pub fn loaded(&self) -> usize {
        self.samples.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_loads_empty_bank() {
        let bank = NoteBank::load(Path::new("/nonexistent/assets"));
        assert_eq!(bank.loaded(), 0);
        // Inert notes never panic.
        bank.trigger(Note::C);
    }

    #[test]
    fn garbage_file_leaves_note_inert() {
        let dir = std::env::temp_dir().join("hand_piano_bank_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(Note::C.asset_file()), b"not audio").unwrap();

        let bank = NoteBank::load(&dir);
        assert_eq!(bank.loaded(), 0);
        bank.trigger(Note::C);

        std::fs::remove_dir_all(&dir).ok();
    }
}
