//! Hand input, gesture recognition and host events

mod event;
mod hand;
mod pinch;
mod simulator;

pub use event::{EventQueue, HostEvent};
pub use hand::{HandPoses, HandSide, JointPair};
pub use pinch::{HandState, PinchRecognizer, PinchTrigger, DEFAULT_PINCH_THRESHOLD};
pub use simulator::{
    demo_surface, hand_with_gap, open_hand, pinched_hand, FrameScript, ScriptedFrame, ScriptedHost,
};
