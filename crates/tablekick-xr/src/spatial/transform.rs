//! Transform representing position, rotation, and scale in 3D space
//!
//! This is the `Pose` of the XR host: tracked surface hits, fingertip joints,
//! the committed anchor and every scene node's local transform.

use super::{Point3D, Quaternion, Vector3D};

/// A complete 3D transform (position + rotation + scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
    pub scale: Vector3D,
}

impl Transform {
    /// Identity transform (origin, no rotation, unit scale)
    pub fn identity() -> Self {
        Self {
            position: Point3D::ORIGIN,
            rotation: Quaternion::IDENTITY,
            scale: Vector3D::ONE,
        }
    }

    /// Create a transform with just position
    pub fn from_position(position: Point3D) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Point3D, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3D::ONE,
        }
    }

    /// Decompose a column-major 4x4 matrix (the layout XR runtimes hand out).
    ///
    /// Returns `None` when the matrix has a degenerate (zero) axis or any
    /// non-finite element.
    pub fn from_column_major(m: &[f32; 16]) -> Option<Self> {
        if m.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let columns = [
            Vector3D::new(m[0], m[1], m[2]),
            Vector3D::new(m[4], m[5], m[6]),
            Vector3D::new(m[8], m[9], m[10]),
        ];
        let scale = Vector3D::new(
            columns[0].magnitude(),
            columns[1].magnitude(),
            columns[2].magnitude(),
        );
        if scale.x <= f32::EPSILON || scale.y <= f32::EPSILON || scale.z <= f32::EPSILON {
            return None;
        }

        let c0 = columns[0] * (1.0 / scale.x);
        let c1 = columns[1] * (1.0 / scale.y);
        let c2 = columns[2] * (1.0 / scale.z);
        let rotation = Quaternion::from_rotation_matrix([
            [c0.x, c1.x, c2.x],
            [c0.y, c1.y, c2.y],
            [c0.z, c1.z, c2.z],
        ]);

        Some(Self {
            position: Point3D::new(m[12], m[13], m[14]),
            rotation,
            scale,
        })
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, local: Point3D) -> Point3D {
        let scaled = local.to_vector().scale_by(&self.scale);
        self.position + self.rotation.rotate_vector(scaled)
    }

    /// Transform a direction vector (ignores position and scale)
    pub fn transform_direction(&self, direction: Vector3D) -> Vector3D {
        self.rotation.rotate_vector(direction)
    }

    /// Inverse transform a point from world space to local space
    pub fn inverse_transform_point(&self, world: Point3D) -> Point3D {
        let relative = world - self.position;
        let unrotated = self.rotation.inverse().rotate_vector(relative);
        Point3D::new(
            unrotated.x / self.scale.x,
            unrotated.y / self.scale.y,
            unrotated.z / self.scale.z,
        )
    }

    /// Compose `self` (parent) with a child's local transform.
    ///
    /// Exact for uniform parent scale, which is all the scene graph uses.
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            position: self.transform_point(local.position),
            rotation: (self.rotation * local.rotation).normalize(),
            scale: self.scale.scale_by(&local.scale),
        }
    }

    /// Express `self` (a world transform) in the local frame of `parent`
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        Transform {
            position: parent.inverse_transform_point(self.position),
            rotation: (parent.rotation.inverse() * self.rotation).normalize(),
            scale: Vector3D::new(
                self.scale.x / parent.scale.x,
                self.scale.y / parent.scale.y,
                self.scale.z / parent.scale.z,
            ),
        }
    }

    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.approx_eq(&other.position, epsilon)
            && self.rotation.approx_eq(&other.rotation, epsilon)
            && self.scale.approx_eq(&other.scale, epsilon)
    }

    /// True if position and rotation hold only finite values
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_transform_point() {
        let t = Transform::from_position(Point3D::new(10.0, 0.0, 0.0));
        let world = t.transform_point(Point3D::new(1.0, 0.0, 0.0));
        assert_eq!(world, Point3D::new(11.0, 0.0, 0.0));
    }

    #[test]
    fn test_inverse_transform() {
        let mut t = Transform::identity();
        t.position = Point3D::new(5.0, 5.0, 5.0);
        t.scale = Vector3D::new(2.0, 2.0, 2.0);

        let local = t.inverse_transform_point(Point3D::new(7.0, 7.0, 7.0));
        assert!(local.approx_eq(&Point3D::new(1.0, 1.0, 1.0), 1e-4));
    }

    #[test]
    fn test_compose_then_relative_round_trip() {
        let parent = Transform::from_position_rotation(
            Point3D::new(0.5, -1.2, 2.0),
            Quaternion::from_axis_angle(Vector3D::UP, PI / 3.0),
        );
        let local = Transform::from_position(Point3D::new(-0.3, 0.15, 0.4));

        let world = parent.compose(&local);
        let back = world.relative_to(&parent);
        assert!(back.approx_eq(&local, 1e-5));
    }

    #[test]
    fn test_from_column_major_translation_and_yaw() {
        // 90 degrees about Y, translated to (1, 2, 3), column-major
        #[rustfmt::skip]
        let m = [
            0.0, 0.0, -1.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            1.0, 0.0, 0.0, 0.0,
            1.0, 2.0, 3.0, 1.0,
        ];
        let t = Transform::from_column_major(&m).expect("valid matrix");
        assert!(t.position.approx_eq(&Point3D::new(1.0, 2.0, 3.0), 1e-6));
        let expected = Quaternion::from_axis_angle(Vector3D::UP, PI / 2.0);
        assert!(t.rotation.approx_eq(&expected, 1e-5));
        assert!(t.scale.approx_eq(&Vector3D::ONE, 1e-6));
    }

    #[test]
    fn test_from_column_major_rejects_degenerate() {
        let mut m = [0.0; 16];
        m[15] = 1.0;
        assert!(Transform::from_column_major(&m).is_none());

        let mut nan = [0.0; 16];
        nan[0] = f32::NAN;
        assert!(Transform::from_column_major(&nan).is_none());
    }
}
