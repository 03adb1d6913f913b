//! Capture-rig calibration.
//!
//! Raw landmark coordinates arrive in centimeters in the capture camera's
//! frame. Calibration converts them to rig space: every axis is divided by
//! `scale`, and the live feed additionally mirrors x about a fixed offset.

use serde::{Deserialize, Serialize};

use crate::math::Point3;

/// Raw-to-rig coordinate transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Divisor applied to every raw coordinate.
    pub scale: f32,
    /// When set, `x' = mirror_x - x / scale`.
    #[serde(default)]
    pub mirror_x: Option<f32>,
}

impl Calibration {
    /// Leaves raw values untouched.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        mirror_x: None,
    };

    /// Recordings: centimeters to meters.
    pub const RECORDED: Self = Self {
        scale: 100.0,
        mirror_x: None,
    };

    /// Live feed: centimeters to meters, x mirrored about 7.
    pub const LIVE: Self = Self {
        scale: 100.0,
        mirror_x: Some(7.0),
    };

    pub fn apply(&self, x: f32, y: f32, z: f32) -> Point3 {
        let sx = x / self.scale;
        let x = match self.mirror_x {
            Some(offset) => offset - sx,
            None => sx,
        };
        Point3::new(x, y / self.scale, z / self.scale)
    }

    /// Inverse of [`Calibration::apply`], back to raw units.
    pub fn unapply(&self, p: Point3) -> [f32; 3] {
        let x = match self.mirror_x {
            Some(offset) => offset - p.x,
            None => p.x,
        };
        [x * self.scale, p.y * self.scale, p.z * self.scale]
    }
}
