//! Frames and tracks.
//!
//! A frame is one time step of the rig: the position of every tracked
//! landmark. A track is the ordered, looping collection of frames read from a
//! recording. Both sources build frames through [`parse_triples`], so the
//! token rules are identical for files and datagrams.

use std::{fmt, io, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{calib::Calibration, math::Point3};

/// One time step's points, in landmark order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    points: Vec<Point3>,
}

impl Frame {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of points in the frame.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Immutable, non-empty sequence of frames with cyclic indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    frames: Vec<Frame>,
}

impl Track {
    /// Builds a track; a track must hold at least one frame.
    pub fn new(frames: Vec<Frame>) -> Result<Self, FrameError> {
        if frames.is_empty() {
            return Err(FrameError::Format {
                line: None,
                reason: FormatReason::EmptyRecording,
            });
        }
        Ok(Self { frames })
    }

    /// Returns the frame at `index`, wrapping past the end.
    pub fn frame_at(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Why a line or message could not be turned into a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatReason {
    /// Token count is not a multiple of 3.
    TokenCount(usize),
    /// A token is not a finite number.
    NotANumber { column: usize, token: String },
    /// Live message shorter than its two delimiters.
    TooShort(usize),
    /// Live message not wrapped in the expected delimiter pair.
    Delimiters {
        expected: (char, char),
        found: (char, char),
    },
    /// Recording holds no frames.
    EmptyRecording,
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatReason::TokenCount(n) => {
                write!(f, "{n} tokens is not a whole number of (x,y,z) triples")
            }
            FormatReason::NotANumber { column, token } => {
                write!(f, "token {column} ({token:?}) is not a number")
            }
            FormatReason::TooShort(n) => {
                write!(f, "message of {n} chars cannot hold a delimiter pair")
            }
            FormatReason::Delimiters { expected, found } => write!(
                f,
                "expected {}...{} delimiters, found {}...{}",
                expected.0, expected.1, found.0, found.1
            ),
            FormatReason::EmptyRecording => write!(f, "recording has no frames"),
        }
    }
}

/// Errors produced while reading recordings or live messages.
#[derive(Debug)]
pub enum FrameError {
    /// The recording could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// Malformed data. `line` is 1-based for recordings, `None` for live
    /// messages and whole-recording problems.
    Format {
        line: Option<usize>,
        reason: FormatReason,
    },
}

impl FrameError {
    /// The format reason, if this is a format error.
    pub fn format_reason(&self) -> Option<&FormatReason> {
        match self {
            FrameError::Format { reason, .. } => Some(reason),
            FrameError::Io { .. } => None,
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            FrameError::Format {
                line: Some(line),
                reason,
            } => write!(f, "line {line}: {reason}"),
            FrameError::Format { line: None, reason } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io { source, .. } => Some(source),
            FrameError::Format { .. } => None,
        }
    }
}

/// Parses a comma-separated body of `(x,y,z)` triples into a calibrated
/// frame. Tokens are trimmed; a blank body is an empty frame.
pub fn parse_triples(
    body: &str,
    calibration: &Calibration,
    line: Option<usize>,
) -> Result<Frame, FrameError> {
    if body.trim().is_empty() {
        return Ok(Frame::default());
    }

    let tokens: Vec<&str> = body.split(',').map(str::trim).collect();
    if tokens.len() % 3 != 0 {
        return Err(FrameError::Format {
            line,
            reason: FormatReason::TokenCount(tokens.len()),
        });
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (column, token) in tokens.iter().enumerate() {
        match token.parse::<f32>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                return Err(FrameError::Format {
                    line,
                    reason: FormatReason::NotANumber {
                        column,
                        token: token.to_string(),
                    },
                })
            }
        }
    }

    let points = values
        .chunks_exact(3)
        .map(|c| calibration.apply(c[0], c[1], c[2]))
        .collect();
    Ok(Frame::new(points))
}

/// Formats a frame's raw coordinates as comma-joined tokens.
pub fn join_triples(frame: &Frame, calibration: &Calibration, separator: &str) -> String {
    frame
        .points()
        .iter()
        .flat_map(|p| calibration.unapply(*p))
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
