// Rotation helpers used by the `Rotate` shape decorator.

use crate::Aabb;
use glam::Mat3;

/// Euler angles in degrees, applied as `Rx * Ry * Rz`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Degrees {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Degrees {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotation about the Y axis only.
    pub fn y(angle: f32) -> Self {
        Self { x: 0.0, y: angle, z: 0.0 }
    }

    /// Forward rotation matrix.
    pub fn to_matrix(self) -> Mat3 {
        Mat3::from_rotation_x(self.x.to_radians())
            * Mat3::from_rotation_y(self.y.to_radians())
            * Mat3::from_rotation_z(self.z.to_radians())
    }
}

/// Extension trait for `Mat3` over bounding boxes.
pub trait Mat3Ext {
    /// Bounding box of all eight transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners();
        let first = *self * corners[0];

        let (lo, hi) = corners[1..]
            .iter()
            .map(|&corner| *self * corner)
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        Aabb::from_points(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn test_degrees_y_rotation() {
        let m = Degrees::y(90.0).to_matrix();
        let rotated = m * Vec3::X;

        // Right-handed: +X turns toward -Z about +Y.
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_transpose_is_inverse() {
        let m = Degrees::new(20.0, -35.0, 70.0).to_matrix();
        let p = Vec3::new(5.0, 3.0, 2.0);
        let back = m.transpose() * (m * p);
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_transform_aabb_rotated_cube() {
        let cube = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let m = Degrees::y(45.0).to_matrix();
        let rotated = m.transform_aabb(&cube);

        let half_diag = std::f32::consts::SQRT_2;
        assert!((rotated.x.size() - half_diag).abs() < 1e-4);
        assert!((rotated.y.size() - 1.0).abs() < 1e-5);
        assert!((rotated.z.size() - half_diag).abs() < 1e-4);
    }

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(Mat3::IDENTITY.transform_aabb(&aabb), aabb);
    }
}
