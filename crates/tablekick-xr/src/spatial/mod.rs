//! Spatial primitives for poses in the tracking and rig frames
//!
//! Uses a right-handed coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)
//!
//! Units are meters, matching what XR runtimes report.

mod point3d;
mod quaternion;
mod transform;
mod vector3d;

pub use point3d::Point3D;
pub use quaternion::Quaternion;
pub use transform::Transform;
pub use vector3d::{Axis, Vector3D};

/// A rigid pose supplied by the host (hit-test result, joint pose, anchor)
pub type Pose = Transform;
