//! Top-down orthographic projection for terminal rendering

use crate::spatial::Point3D;

/// World-space XZ rectangle mapped onto the character grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopDownProjection {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl TopDownProjection {
    /// Fit the XZ bounding box of `points`, padded by `margin` on every side.
    ///
    /// Returns `None` when there are no finite points.
    pub fn fit<'a, I>(points: I, margin: f32) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut bounds: Option<Self> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            let b = bounds.get_or_insert(Self {
                min_x: p.x,
                max_x: p.x,
                min_z: p.z,
                max_z: p.z,
            });
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_z = b.min_z.min(p.z);
            b.max_z = b.max_z.max(p.z);
        }

        bounds.map(|b| {
            // Square up so one world unit covers the same distance on both axes
            let span = (b.max_x - b.min_x).max(b.max_z - b.min_z) / 2.0 + margin;
            let cx = (b.min_x + b.max_x) / 2.0;
            let cz = (b.min_z + b.max_z) / 2.0;
            Self {
                min_x: cx - span,
                max_x: cx + span,
                min_z: cz - span,
                max_z: cz + span,
            }
        })
    }

    /// Map a world point to a grid cell; +X runs right, -Z runs up the screen.
    ///
    /// Terminal cells are about twice as tall as wide, so rows are halved.
    pub fn to_cell(&self, point: Point3D, width: u16, height: u16) -> Option<(u16, u16)> {
        if width == 0 || height == 0 || !point.is_finite() {
            return None;
        }
        let span_x = self.max_x - self.min_x;
        let span_z = self.max_z - self.min_z;
        if span_x <= 0.0 || span_z <= 0.0 {
            return None;
        }

        let u = (point.x - self.min_x) / span_x;
        let v = (point.z - self.min_z) / span_z;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        let cols = width.min(height.saturating_mul(2)) as f32;
        let rows = cols / 2.0;
        let x = (u * (cols - 1.0)).round() as u16;
        let y = (v * (rows - 1.0).max(0.0)).round() as u16;
        Some((x.min(width - 1), y.min(height - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_is_square_and_padded() {
        let points = [Point3D::new(-0.6, 0.0, -0.35), Point3D::new(0.6, 0.0, 0.35)];
        let proj = TopDownProjection::fit(points.iter(), 0.1).unwrap();
        assert!((proj.max_x - proj.min_x - 1.4).abs() < 1e-5);
        assert!((proj.max_z - proj.min_z - 1.4).abs() < 1e-5);
    }

    #[test]
    fn test_corners_map_to_grid_edges() {
        let proj = TopDownProjection {
            min_x: -1.0,
            max_x: 1.0,
            min_z: -1.0,
            max_z: 1.0,
        };
        assert_eq!(proj.to_cell(Point3D::new(-1.0, 0.0, -1.0), 40, 20), Some((0, 0)));
        assert_eq!(proj.to_cell(Point3D::new(1.0, 0.0, 1.0), 40, 20), Some((39, 19)));
        assert_eq!(proj.to_cell(Point3D::new(2.0, 0.0, 0.0), 40, 20), None);
    }

    #[test]
    fn test_fit_empty() {
        assert!(TopDownProjection::fit(std::iter::empty(), 0.1).is_none());
    }
}
