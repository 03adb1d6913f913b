//! Configuration system.
//!
//! Loads rig configuration from JSON strings or files. Binaries layer their
//! command-line flags on top.

use std::{path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::{
    calib::Calibration,
    live::{Delimiters, LiveFrameSource},
    net::DEFAULT_FEED_ADDR,
    recorded::RecordedFrameSource,
};

/// Highest accepted playback rate; keeps the tick period above zero.
pub const MAX_TICK_HZ: u32 = 1000;

/// Root configuration shared by the player and the feed tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// UDP address the live feed arrives on (player) or is sent to (feed).
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Playback rate in ticks per second.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Recording to replay. Live mode when unset.
    #[serde(default)]
    pub recording: Option<String>,
    /// Number of target points in the rig.
    #[serde(default = "default_point_count")]
    pub point_count: usize,
    #[serde(default = "default_recorded_calibration")]
    pub recorded: Calibration,
    #[serde(default = "default_live_calibration")]
    pub live: Calibration,
    #[serde(default)]
    pub delimiters: Delimiters,
}

fn default_listen_addr() -> String {
    DEFAULT_FEED_ADDR.to_string()
}

// 50 ms per frame.
fn default_tick_hz() -> u32 {
    20
}

// One hand's landmarks.
fn default_point_count() -> usize {
    21
}

fn default_recorded_calibration() -> Calibration {
    Calibration::RECORDED
}

fn default_live_calibration() -> Calibration {
    Calibration::LIVE
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            tick_hz: default_tick_hz(),
            recording: None,
            point_count: default_point_count(),
            recorded: default_recorded_calibration(),
            live: default_live_calibration(),
            delimiters: Delimiters::default(),
        }
    }
}

impl RigConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Rejects values that would stall or divide by zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_TICK_HZ).contains(&self.tick_hz) {
            bail!("tick_hz must be in 1..={MAX_TICK_HZ}, got {}", self.tick_hz);
        }
        for (name, c) in [("recorded", &self.recorded), ("live", &self.live)] {
            if c.scale == 0.0 || !c.scale.is_finite() {
                bail!("{name} calibration scale must be finite and non-zero");
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_hz.max(1)))
    }

    pub fn recorded_source(&self) -> RecordedFrameSource {
        RecordedFrameSource::new(self.recorded)
    }

    pub fn live_source(&self) -> LiveFrameSource {
        LiveFrameSource::new(self.live, self.delimiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let cfg = RigConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, RigConfig::default());
        assert_eq!(cfg.tick_interval(), Duration::from_millis(50));
        assert_eq!(cfg.live, Calibration::LIVE);
    }

    #[test]
    fn overrides_parse() {
        let cfg = RigConfig::from_json_str(
            r#"{
                "listen_addr": "0.0.0.0:9000",
                "tick_hz": 60,
                "recording": "right.txt",
                "point_count": 42,
                "live": { "scale": 100.0, "mirror_x": 5.0 },
                "delimiters": { "open": "(", "close": ")" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:9000");
        assert_eq!(cfg.recording.as_deref(), Some("right.txt"));
        assert_eq!(cfg.point_count, 42);
        assert_eq!(cfg.live.mirror_x, Some(5.0));
        assert_eq!(cfg.delimiters.open, '(');
        assert_eq!(cfg.recorded, Calibration::RECORDED);
    }

    #[test]
    fn validate_rejects_zero_rate_and_scale() {
        let cfg = RigConfig {
            tick_hz: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RigConfig {
            tick_hz: 2_000_000_000,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RigConfig {
            tick_hz: MAX_TICK_HZ,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.tick_interval(), Duration::from_millis(1));

        let cfg = RigConfig {
            recorded: Calibration {
                scale: 0.0,
                mirror_x: None,
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(RigConfig::default().validate().is_ok());
    }
}
