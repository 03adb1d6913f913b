//! Scene abstraction.
//!
//! The rig does not own a scene graph. The host supplies ordered targets that
//! accept a local position; `SceneNode` is the in-crate implementation used by
//! the binaries and headless tests.

use crate::math::Point3;

/// Landmark names of one tracked hand, in capture order.
pub const HAND_LANDMARKS: [&str; 21] = [
    "wrist",
    "thumb_cmc",
    "thumb_mcp",
    "thumb_ip",
    "thumb_tip",
    "index_mcp",
    "index_pip",
    "index_dip",
    "index_tip",
    "middle_mcp",
    "middle_pip",
    "middle_dip",
    "middle_tip",
    "ring_mcp",
    "ring_pip",
    "ring_dip",
    "ring_tip",
    "pinky_mcp",
    "pinky_pip",
    "pinky_dip",
    "pinky_tip",
];

/// A host-owned object whose position the player writes each tick.
pub trait PositionTarget {
    fn set_local_position(&mut self, position: Point3);
}

impl<T: PositionTarget + ?Sized> PositionTarget for Box<T> {
    fn set_local_position(&mut self, position: Point3) {
        (**self).set_local_position(position);
    }
}

/// Named point in a headless scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    pub name: String,
    pub local_position: Point3,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_position: Point3::ZERO,
        }
    }

    /// `count` generic nodes named `point_0..`.
    pub fn rig(count: usize) -> Vec<SceneNode> {
        (0..count).map(|i| SceneNode::new(format!("point_{i}"))).collect()
    }

    /// One node per landmark for `hands` hands, hand-major.
    pub fn hand_rig(hands: usize) -> Vec<SceneNode> {
        (0..hands)
            .flat_map(|h| {
                HAND_LANDMARKS
                    .iter()
                    .map(move |lm| SceneNode::new(format!("hand{h}_{lm}")))
            })
            .collect()
    }
}

impl PositionTarget for SceneNode {
    fn set_local_position(&mut self, position: Point3) {
        self.local_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_rig_names_are_hand_major() {
        let nodes = SceneNode::hand_rig(2);
        assert_eq!(nodes.len(), 42);
        assert_eq!(nodes[0].name, "hand0_wrist");
        assert_eq!(nodes[20].name, "hand0_pinky_tip");
        assert_eq!(nodes[21].name, "hand1_wrist");
    }

    #[test]
    fn boxed_targets_forward() {
        let mut node: Box<SceneNode> = Box::new(SceneNode::new("a"));
        node.set_local_position(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(node.local_position, Point3::new(1.0, 2.0, 3.0));
    }
}
