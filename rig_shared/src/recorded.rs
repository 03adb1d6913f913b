//! Recorded landmark tracks.
//!
//! A recording is plain text, one frame per line, each line a comma-separated
//! list of raw `(x,y,z)` triples. The whole file is validated up front; a
//! loaded [`Track`] never fails during playback.
//!
//! # Usage
//! ```ignore
//! let track = RecordedFrameSource::default().load("recordings/right.txt")?;
//! println!("{} frames", track.len());
//! ```

use std::{fs, path::Path};

use tracing::{debug, info};

use crate::{
    calib::Calibration,
    frame::{join_triples, parse_triples, Frame, FrameError, Track},
};

/// Loads and writes line-oriented recordings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedFrameSource {
    calibration: Calibration,
}

impl Default for RecordedFrameSource {
    fn default() -> Self {
        Self::new(Calibration::RECORDED)
    }
}

impl RecordedFrameSource {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Reads and parses a recording from disk.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Track, FrameError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FrameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let track = self.parse_str(&text)?;
        info!(path = %path.display(), frames = track.len(), "Recording loaded");
        Ok(track)
    }

    /// Parses an in-memory recording. Whitespace-only lines are skipped.
    pub fn parse_str(&self, text: &str) -> Result<Track, FrameError> {
        let mut frames = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                debug!(line = idx + 1, "Skipping blank recording line");
                continue;
            }
            frames.push(parse_triples(line, &self.calibration, Some(idx + 1))?);
        }
        Track::new(frames)
    }

    /// Formats one frame as a recording line (no trailing newline).
    pub fn encode_line(&self, frame: &Frame) -> String {
        join_triples(frame, &self.calibration, ",")
    }

    /// Writes a track in the recording format, one line per frame.
    pub fn save<P: AsRef<Path>>(&self, path: P, track: &Track) -> Result<(), FrameError> {
        let path = path.as_ref();
        let mut out = String::new();
        for frame in track.frames() {
            out.push_str(&self.encode_line(frame));
            out.push('\n');
        }
        fs::write(path, out).map_err(|source| FrameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), frames = track.len(), "Recording saved");
        Ok(())
    }
}
