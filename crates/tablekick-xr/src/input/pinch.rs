//! Edge-triggered pinch recognition
//!
//! A pinch fires once, on the frame the thumb-index distance drops below the
//! threshold. Holding the pinch fires nothing; the hand must open back to at
//! least the threshold before it can fire again. Losing joint data for a hand
//! silently re-arms it.

use super::{HandPoses, HandSide};

/// Default thumb-index distance below which a hand counts as pinched (meters)
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.03;

/// One pinch onset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchTrigger {
    pub side: HandSide,
}

/// Latest measurement and latch for one hand
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandState {
    /// Tip distance seen this frame, `None` when joints were missing
    pub distance: Option<f32>,
    /// Latched while the hand stays pinched
    pub pinched: bool,
}

#[derive(Debug, Clone)]
pub struct PinchRecognizer {
    threshold: f32,
    left: HandState,
    right: HandState,
}

impl PinchRecognizer {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            left: HandState::default(),
            right: HandState::default(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn hand_state(&self, side: HandSide) -> HandState {
        match side {
            HandSide::Left => self.left,
            HandSide::Right => self.right,
        }
    }

    /// Feed one frame of joint data; returns triggers in left, right order
    pub fn update(&mut self, hands: &HandPoses) -> Vec<PinchTrigger> {
        let mut triggers = Vec::new();

        for side in HandSide::BOTH {
            let distance = hands
                .get(side)
                .map(|joints| joints.tip_distance())
                .filter(|d| d.is_finite());
            let threshold = self.threshold;
            let state = self.state_mut(side);
            state.distance = distance;

            match distance {
                Some(d) if d < threshold => {
                    if !state.pinched {
                        state.pinched = true;
                        tracing::debug!("pinch onset on {} hand ({:.4} m)", side, d);
                        triggers.push(PinchTrigger { side });
                    }
                }
                Some(_) => state.pinched = false,
                None => state.pinched = false,
            }
        }

        triggers
    }

    /// Clear both latches (tracking lost, session teardown)
    pub fn reset(&mut self) {
        self.left = HandState::default();
        self.right = HandState::default();
    }

    fn state_mut(&mut self, side: HandSide) -> &mut HandState {
        match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        }
    }
}

impl Default for PinchRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_PINCH_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::JointPair;
    use crate::spatial::{Point3D, Transform};

    fn hand(gap: f32) -> JointPair {
        JointPair::new(
            Transform::from_position(Point3D::new(0.0, 1.0, -0.3)),
            Transform::from_position(Point3D::new(gap, 1.0, -0.3)),
        )
    }

    fn right(gap: f32) -> HandPoses {
        HandPoses::none().with(HandSide::Right, hand(gap))
    }

    #[test]
    fn test_hold_fires_once() {
        let mut recognizer = PinchRecognizer::default();
        let mut fired = 0;
        for _ in 0..10 {
            fired += recognizer.update(&right(0.01)).len();
        }
        assert_eq!(fired, 1);
        assert!(recognizer.hand_state(HandSide::Right).pinched);
    }

    #[test]
    fn test_release_and_repinch() {
        let mut recognizer = PinchRecognizer::default();
        assert_eq!(recognizer.update(&right(0.01)).len(), 1);
        assert!(recognizer.update(&right(0.05)).is_empty());
        assert_eq!(
            recognizer.update(&right(0.01)),
            vec![PinchTrigger {
                side: HandSide::Right
            }]
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut recognizer = PinchRecognizer::new(0.03);
        assert!(recognizer.update(&right(0.03)).is_empty());
        assert_eq!(recognizer.update(&right(0.029)).len(), 1);
    }

    #[test]
    fn test_missing_joints_rearm_without_event() {
        let mut recognizer = PinchRecognizer::default();
        assert_eq!(recognizer.update(&right(0.01)).len(), 1);

        assert!(recognizer.update(&HandPoses::none()).is_empty());
        let state = recognizer.hand_state(HandSide::Right);
        assert_eq!(state.distance, None);
        assert!(!state.pinched);

        assert_eq!(recognizer.update(&right(0.01)).len(), 1);
    }

    #[test]
    fn test_hands_are_independent() {
        let mut recognizer = PinchRecognizer::default();
        let both = HandPoses::none()
            .with(HandSide::Left, hand(0.01))
            .with(HandSide::Right, hand(0.01));
        let triggers = recognizer.update(&both);
        assert_eq!(
            triggers,
            vec![
                PinchTrigger {
                    side: HandSide::Left
                },
                PinchTrigger {
                    side: HandSide::Right
                }
            ]
        );

        let left_only = HandPoses::none()
            .with(HandSide::Left, hand(0.01))
            .with(HandSide::Right, hand(0.08));
        assert!(recognizer.update(&left_only).is_empty());
        assert!(recognizer.hand_state(HandSide::Left).pinched);
        assert!(!recognizer.hand_state(HandSide::Right).pinched);
    }

    #[test]
    fn test_reset_clears_latches() {
        let mut recognizer = PinchRecognizer::default();
        recognizer.update(&right(0.01));
        recognizer.reset();
        assert_eq!(recognizer.update(&right(0.01)).len(), 1);
    }
}
