//! Scripted XR host for development and tests
//!
//! Replays a prepared sequence of frames and events so the full game loop can
//! run without AR hardware.

use std::collections::VecDeque;

use async_trait::async_trait;

use super::{HandPoses, HandSide, HostEvent, JointPair};
use crate::host::{
    Capability, CapabilitySet, FrameInput, HostError, ReferenceSpace, SessionGrant, XrHost,
};
use crate::spatial::{Point3D, Pose, Quaternion, Transform, Vector3D};

/// Fingertip gap of a relaxed hand (meters)
const OPEN_GAP: f32 = 0.08;
/// Fingertip gap of a closed pinch (meters)
const PINCH_GAP: f32 = 0.01;

/// Joint pair with the index tip `gap` meters to the right of the thumb tip
pub fn hand_with_gap(at: Point3D, gap: f32) -> JointPair {
    JointPair::new(
        Transform::from_position(at),
        Transform::from_position(at + Vector3D::new(gap, 0.0, 0.0)),
    )
}

pub fn open_hand(at: Point3D) -> JointPair {
    hand_with_gap(at, OPEN_GAP)
}

pub fn pinched_hand(at: Point3D) -> JointPair {
    hand_with_gap(at, PINCH_GAP)
}

/// One frame of scripted input plus the events that arrive with it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedFrame {
    pub input: FrameInput,
    pub events: Vec<HostEvent>,
}

/// Builder for scripted frame sequences
#[derive(Debug, Clone)]
pub struct FrameScript {
    delta: f32,
    surface: Option<Pose>,
    hands_visible: bool,
    left_at: Point3D,
    right_at: Point3D,
    frames: Vec<ScriptedFrame>,
}

impl FrameScript {
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            surface: None,
            hands_visible: true,
            left_at: Point3D::new(-0.15, -0.3, -0.4),
            right_at: Point3D::new(0.15, -0.3, -0.4),
            frames: Vec::new(),
        }
    }

    /// Report `pose` as the surface hit on following frames
    pub fn with_surface(mut self, pose: Pose) -> Self {
        self.surface = Some(pose);
        self
    }

    pub fn without_surface(mut self) -> Self {
        self.surface = None;
        self
    }

    /// Stop reporting hand joints (hosts without hand tracking)
    pub fn without_hands(mut self) -> Self {
        self.hands_visible = false;
        self
    }

    pub fn with_hands(mut self) -> Self {
        self.hands_visible = true;
        self
    }

    /// `count` ordinary frames with open hands
    pub fn idle(mut self, count: usize) -> Self {
        for _ in 0..count {
            let frame = self.frame(self.open_hands());
            self.frames.push(frame);
        }
        self
    }

    /// One frame carrying a selection event
    pub fn select(self) -> Self {
        self.event(HostEvent::Select)
    }

    pub fn resize(self, width: u32, height: u32) -> Self {
        self.event(HostEvent::Resize { width, height })
    }

    /// Pinch `side` for `hold` frames, then open it for one frame
    pub fn pinch(mut self, side: HandSide, hold: usize) -> Self {
        if !self.hands_visible {
            return self.idle(hold + 1);
        }
        let mut hands = self.open_hands();
        match side {
            HandSide::Left => hands.left = Some(pinched_hand(self.left_at)),
            HandSide::Right => hands.right = Some(pinched_hand(self.right_at)),
        }
        for _ in 0..hold {
            let frame = self.frame(hands);
            self.frames.push(frame);
        }
        self.idle(1)
    }

    /// `count` frames with tracking lost
    pub fn lose_tracking(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.frames.push(ScriptedFrame {
                input: FrameInput::lost(self.delta),
                events: Vec::new(),
            });
        }
        self
    }

    /// One frame whose delta is `seconds` (a host hitch)
    pub fn hitch(mut self, seconds: f32) -> Self {
        let mut frame = self.frame(self.open_hands());
        frame.input.delta = seconds;
        self.frames.push(frame);
        self
    }

    pub fn end_session(self) -> Self {
        self.event(HostEvent::SessionEnded)
    }

    pub fn build(self) -> Vec<ScriptedFrame> {
        self.frames
    }

    /// Place the table, kick right, kick left, drop tracking, end
    pub fn demo(delta: f32) -> Self {
        Self::new(delta)
            .with_surface(demo_surface())
            .idle(20)
            .select()
            .idle(30)
            .pinch(HandSide::Right, 5)
            .idle(90)
            .pinch(HandSide::Left, 5)
            .idle(90)
            .lose_tracking(10)
            .idle(10)
            .end_session()
    }

    /// Place the table and let the ball sit
    pub fn idle_demo(delta: f32, frames: usize) -> Self {
        Self::new(delta)
            .with_surface(demo_surface())
            .idle(10)
            .select()
            .idle(frames)
            .end_session()
    }

    fn event(mut self, event: HostEvent) -> Self {
        let mut frame = self.frame(self.open_hands());
        frame.events.push(event);
        self.frames.push(frame);
        self
    }

    fn open_hands(&self) -> HandPoses {
        if !self.hands_visible {
            return HandPoses::none();
        }
        HandPoses::none()
            .with(HandSide::Left, open_hand(self.left_at))
            .with(HandSide::Right, open_hand(self.right_at))
    }

    fn frame(&self, hands: HandPoses) -> ScriptedFrame {
        let mut input = FrameInput::new(self.delta).with_hands(hands);
        input.hit_pose = self.surface;
        ScriptedFrame {
            input,
            events: Vec::new(),
        }
    }
}

/// A table top a meter ahead and half a meter down, turned slightly
pub fn demo_surface() -> Pose {
    Transform::from_position_rotation(
        Point3D::new(0.0, -0.5, -1.0),
        Quaternion::from_axis_angle(Vector3D::UP, 0.2),
    )
}

/// XR host that replays scripted frames
#[derive(Debug)]
pub struct ScriptedHost {
    capabilities: CapabilitySet,
    frames: VecDeque<ScriptedFrame>,
    pending: Vec<HostEvent>,
    started: bool,
    ended: bool,
    frames_served: usize,
    setup_failure: Option<String>,
}

impl ScriptedHost {
    pub fn new(capabilities: CapabilitySet, frames: impl IntoIterator<Item = ScriptedFrame>) -> Self {
        Self {
            capabilities,
            frames: frames.into_iter().collect(),
            pending: Vec::new(),
            started: false,
            ended: false,
            frames_served: 0,
            setup_failure: None,
        }
    }

    /// Host with hit-testing and hand tracking
    pub fn full(frames: impl IntoIterator<Item = ScriptedFrame>) -> Self {
        Self::new(CapabilitySet::all(), frames)
    }

    /// Host with hit-testing only
    pub fn hit_test_only(frames: impl IntoIterator<Item = ScriptedFrame>) -> Self {
        Self::new(CapabilitySet::new().with(Capability::HitTest), frames)
    }

    /// Make `start_session` fail with `message`
    pub fn with_setup_failure(mut self, message: impl Into<String>) -> Self {
        self.setup_failure = Some(message.into());
        self
    }

    pub fn push_frame(&mut self, frame: ScriptedFrame) {
        self.frames.push_back(frame);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn frames_served(&self) -> usize {
        self.frames_served
    }

    pub fn frames_remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl XrHost for ScriptedHost {
    fn supported_capabilities(&self) -> CapabilitySet {
        self.capabilities.clone()
    }

    async fn start_session(&mut self, required: &CapabilitySet) -> Result<SessionGrant, HostError> {
        if self.started {
            return Err(HostError::AlreadyStarted);
        }
        if let Some(message) = &self.setup_failure {
            return Err(HostError::Setup(message.clone()));
        }
        if required.contains(Capability::HitTest) && !self.capabilities.contains(Capability::HitTest) {
            return Err(HostError::HitTestSource("no hit-test support".to_string()));
        }

        self.started = true;
        Ok(SessionGrant {
            granted: self.capabilities.clone(),
            reference_space: ReferenceSpace::Local,
        })
    }

    fn next_frame(&mut self) -> Option<FrameInput> {
        if !self.started || self.ended {
            return None;
        }
        let frame = self.frames.pop_front()?;
        self.pending.extend(frame.events);
        self.frames_served += 1;
        Some(frame.input)
    }

    fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending)
    }

    fn end_session(&mut self) {
        self.ended = true;
        self.frames.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::open_session;
    use crate::input::PinchRecognizer;

    #[test]
    fn test_pinch_script_triggers_once() {
        let frames = FrameScript::new(1.0 / 60.0)
            .idle(2)
            .pinch(HandSide::Left, 4)
            .build();
        assert_eq!(frames.len(), 7);

        let mut recognizer = PinchRecognizer::default();
        let fired: usize = frames
            .iter()
            .map(|f| recognizer.update(&f.input.hands).len())
            .sum();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_script_without_hands() {
        let frames = FrameScript::new(0.016).without_hands().pinch(HandSide::Right, 3).build();
        assert_eq!(frames.len(), 4);
        assert!(frames.iter().all(|f| f.input.hands == HandPoses::none()));
    }

    #[tokio::test]
    async fn test_frames_and_events_flow() {
        let frames = FrameScript::new(0.016)
            .with_surface(demo_surface())
            .idle(1)
            .select()
            .build();
        let mut host = ScriptedHost::full(frames);
        assert!(host.next_frame().is_none(), "no frames before setup");

        open_session(&mut host, &CapabilitySet::all()).await.unwrap();

        let first = host.next_frame().unwrap();
        assert_eq!(first.hit_pose, Some(demo_surface()));
        assert!(host.drain_events().is_empty());

        host.next_frame().unwrap();
        assert_eq!(host.drain_events(), vec![HostEvent::Select]);
        assert!(host.next_frame().is_none());
        assert_eq!(host.frames_served(), 2);
    }

    #[tokio::test]
    async fn test_gate_rejects_missing_hand_tracking() {
        let mut host = ScriptedHost::hit_test_only(FrameScript::demo(0.016).build());
        let err = open_session(&mut host, &CapabilitySet::all()).await.unwrap_err();
        assert!(matches!(err, HostError::Capability(_)));
        assert!(!host.is_started());
    }

    #[tokio::test]
    async fn test_setup_failure() {
        let mut host = ScriptedHost::full(Vec::new()).with_setup_failure("no reference space");
        let err = open_session(&mut host, &CapabilitySet::all()).await.unwrap_err();
        assert!(matches!(err, HostError::Setup(_)));
    }
}
