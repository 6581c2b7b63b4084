//! tablekick-xr: host-facing XR abstractions for the tablekick game
//!
//! This crate provides:
//! - 3D spatial math (points, vectors, quaternions, poses)
//! - The XR host seam: capability gate, async session setup, per-frame input
//! - Hand joint input, edge-triggered pinch recognition and host events
//! - A scene graph and display sinks (terminal simulation, logging, recording)
//! - Fire-and-forget audio cue sinks

pub mod audio;
pub mod display;
pub mod host;
pub mod input;
pub mod spatial;

// Re-export commonly used types
pub use audio::{Cue, CueSink};
pub use display::{Color, DisplaySink, NodeId, Scene, Shape, VisualNode};
pub use host::{Capability, CapabilitySet, FrameInput, TrackingState, XrHost};
pub use input::{HandPoses, HandSide, HostEvent, PinchRecognizer, PinchTrigger};
pub use spatial::{Axis, Point3D, Pose, Quaternion, Transform, Vector3D};
