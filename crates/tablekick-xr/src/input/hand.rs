//! Per-hand joint poses

use crate::spatial::Pose;

/// Which hand a joint sample or trigger belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const BOTH: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

impl std::fmt::Display for HandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thumb-tip and index-tip poses of one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPair {
    pub thumb_tip: Pose,
    pub index_tip: Pose,
}

impl JointPair {
    pub fn new(thumb_tip: Pose, index_tip: Pose) -> Self {
        Self {
            thumb_tip,
            index_tip,
        }
    }

    /// Euclidean distance between the two fingertips, in meters
    pub fn tip_distance(&self) -> f32 {
        self.thumb_tip.position.distance(&self.index_tip.position)
    }
}

/// Joint data for both hands; a missing hand or joint is `None`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandPoses {
    pub left: Option<JointPair>,
    pub right: Option<JointPair>,
}

impl HandPoses {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn get(&self, side: HandSide) -> Option<&JointPair> {
        match side {
            HandSide::Left => self.left.as_ref(),
            HandSide::Right => self.right.as_ref(),
        }
    }

    pub fn with(mut self, side: HandSide, joints: JointPair) -> Self {
        match side {
            HandSide::Left => self.left = Some(joints),
            HandSide::Right => self.right = Some(joints),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point3D, Transform};

    #[test]
    fn test_tip_distance() {
        let joints = JointPair::new(
            Transform::from_position(Point3D::new(0.0, 1.0, -0.4)),
            Transform::from_position(Point3D::new(0.0, 1.05, -0.4)),
        );
        assert!((joints.tip_distance() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_hand_lookup() {
        let joints = JointPair::new(Transform::identity(), Transform::identity());
        let hands = HandPoses::none().with(HandSide::Right, joints);
        assert!(hands.get(HandSide::Left).is_none());
        assert_eq!(hands.get(HandSide::Right), Some(&joints));
    }
}
