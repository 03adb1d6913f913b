//! Math types.
//!
//! Kept small and deterministic; only what the rig needs.

use serde::{Deserialize, Serialize};

/// A landmark position in rig space (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(self, rhs: Self, eps: f32) -> bool {
        (self.x - rhs.x).abs() <= eps
            && (self.y - rhs.y).abs() <= eps
            && (self.z - rhs.z).abs() <= eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_tolerates_rounding() {
        let a = Point3::new(0.1 + 0.2, 1.0, -2.0);
        let b = Point3::new(0.3, 1.0, -2.0);
        assert!(a.approx_eq(b, 1e-6));
        assert!(!a.approx_eq(Point3::ZERO, 1e-6));
    }
}
