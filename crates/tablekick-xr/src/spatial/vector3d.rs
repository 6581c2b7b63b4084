//! 3D vector representation for directions, impulses and velocities

use std::ops::{Add, Mul, Neg, Sub};

/// A vector in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit scale (1, 1, 1)
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector pointing up (+Y)
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector pointing forward (+Z)
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a new 3D vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Calculate the magnitude (length) of the vector
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Calculate the squared magnitude (faster, avoids sqrt)
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalize the vector (make it unit length); zero stays zero
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self::new(self.x / mag, self.y / mag, self.z / mag)
        } else {
            Self::ZERO
        }
    }

    /// Calculate the dot product with another vector
    pub fn dot(&self, other: &Vector3D) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculate the cross product with another vector
    pub fn cross(&self, other: &Vector3D) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Component-wise product (used for applying scale)
    pub fn scale_by(&self, other: &Vector3D) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    pub fn approx_eq(&self, other: &Vector3D, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    /// Convert to a Point3D
    pub fn to_point(&self) -> super::Point3D {
        super::Point3D::new(self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vector3D {
    fn from(v: [f32; 3]) -> Self {
        Vector3D::new(v[0], v[1], v[2])
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f32) -> Self::Output {
        Vector3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Self::Output {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}

/// A principal axis of a local frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Vector3D {
        match self {
            Axis::X => Vector3D::RIGHT,
            Axis::Y => Vector3D::UP,
            Axis::Z => Vector3D::FORWARD,
        }
    }

    /// Extract the component of `v` along this axis
    pub fn component(self, v: &Vector3D) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let v = Vector3D::new(3.0, 0.0, 0.0);
        let n = v.normalize();
        assert!((n.magnitude() - 1.0).abs() < 0.0001);
        assert_eq!(Vector3D::ZERO.normalize(), Vector3D::ZERO);
    }

    #[test]
    fn test_cross_product() {
        // (1,0,0) x (0,1,0) = (0,0,1)
        let result = Vector3D::RIGHT.cross(&Vector3D::UP);
        assert!(result.approx_eq(&Vector3D::FORWARD, 1e-6));
    }

    #[test]
    fn test_axis_component() {
        let v = Vector3D::new(-0.2, 0.5, 0.7);
        assert_eq!(Axis::X.component(&v), -0.2);
        assert_eq!(Axis::Z.component(&v), 0.7);
        assert_eq!(Axis::Y.unit(), Vector3D::UP);
    }
}
