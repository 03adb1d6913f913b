//! Live landmark messages.
//!
//! The upstream capture process sends each detection as one string: a
//! delimiter pair wrapping comma-separated raw `(x,y,z)` triples, e.g.
//! `[312, 240, -12, ...]`. Parsing strips exactly one character from each end
//! and requires those characters to be the configured delimiters. The strip is
//! positional; nested or repeated delimiters are not interpreted.

use serde::{Deserialize, Serialize};

use crate::{
    calib::Calibration,
    frame::{join_triples, parse_triples, FormatReason, Frame, FrameError},
};

/// Opening and closing characters around a live message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '[',
            close: ']',
        }
    }
}

/// Stateless decoder for live messages. Each call is independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveFrameSource {
    calibration: Calibration,
    delimiters: Delimiters,
}

impl Default for LiveFrameSource {
    fn default() -> Self {
        Self::new(Calibration::LIVE, Delimiters::default())
    }
}

impl LiveFrameSource {
    pub fn new(calibration: Calibration, delimiters: Delimiters) -> Self {
        Self {
            calibration,
            delimiters,
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Parses one raw message into a calibrated frame.
    pub fn parse(&self, raw: &str) -> Result<Frame, FrameError> {
        let mut chars = raw.chars();
        let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
            return Err(FrameError::Format {
                line: None,
                reason: FormatReason::TooShort(raw.chars().count()),
            });
        };
        let expected = (self.delimiters.open, self.delimiters.close);
        if (first, last) != expected {
            return Err(FrameError::Format {
                line: None,
                reason: FormatReason::Delimiters {
                    expected,
                    found: (first, last),
                },
            });
        }

        parse_triples(chars.as_str(), &self.calibration, None)
    }

    /// Formats a frame the way the capture process sends it.
    pub fn encode_message(&self, frame: &Frame) -> String {
        format!(
            "{}{}{}",
            self.delimiters.open,
            join_triples(frame, &self.calibration, ", "),
            self.delimiters.close
        )
    }
}
