//! Per-frame input handed over by the XR host

use crate::input::HandPoses;
use crate::spatial::Pose;

/// Whether the host is currently tracking the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    Tracking,
    /// Viewer pose is unavailable this frame; hit and hand data are stale
    Lost,
}

/// Everything the host reports for one frame. Absent poses are valid input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Wall-clock seconds since the previous frame
    pub delta: f32,
    /// Surface hit under the viewer's gaze ray, if any
    pub hit_pose: Option<Pose>,
    pub hands: HandPoses,
    pub tracking: TrackingState,
}

impl FrameInput {
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            ..Default::default()
        }
    }

    /// A frame with tracking lost and no pose data
    pub fn lost(delta: f32) -> Self {
        Self {
            delta,
            tracking: TrackingState::Lost,
            ..Default::default()
        }
    }

    pub fn with_hit_pose(mut self, pose: Pose) -> Self {
        self.hit_pose = Some(pose);
        self
    }

    pub fn with_hands(mut self, hands: HandPoses) -> Self {
        self.hands = hands;
        self
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking == TrackingState::Tracking
    }
}
