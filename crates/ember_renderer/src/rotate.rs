//! Rotation decorator.

use std::sync::Arc;

use ember_math::{Aabb, Degrees, Interval, Mat3, Mat3Ext, Ray, Vec3};

use crate::shape::{HitRecord, Shape};

/// Rotates a shape about the origin by Euler angles.
///
/// Rays are rotated into object space with the inverse matrix; hit points
/// and normals come back through the forward matrix. The bounding box is
/// the box around all eight rotated corners and is computed once.
pub struct Rotate {
    shape: Arc<dyn Shape>,
    forward: Mat3,
    inverse: Mat3,
    bbox: Option<Aabb>,
}

impl Rotate {
    pub fn new(shape: Arc<dyn Shape>, angles: Degrees) -> Self {
        let forward = angles.to_matrix();
        let inverse = forward.transpose();
        let bbox = shape.bounding_box().map(|b| forward.transform_aabb(&b));

        Self {
            shape,
            forward,
            inverse,
            bbox,
        }
    }

    /// Rotation about the Y axis only.
    pub fn y(shape: Arc<dyn Shape>, angle: f32) -> Self {
        Self::new(shape, Degrees::y(angle))
    }
}

impl Shape for Rotate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let local = Ray::new(self.inverse * ray.origin(), self.inverse * ray.direction());
        if !self.shape.hit(&local, ray_t, rec) {
            return false;
        }

        // Rotation preserves the sign of dot(direction, normal), so the
        // front/back flag carries over.
        rec.p = self.forward * rec.p;
        rec.normal = self.forward * rec.normal;
        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.shape
            .pdf_value(self.inverse * origin, self.inverse * direction)
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        self.forward * self.shape.random_direction(self.inverse * origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuboid::Cuboid;
    use crate::material::Lambertian;

    fn unit_box() -> Arc<dyn Shape> {
        Arc::new(Cuboid::new(
            Vec3::ZERO,
            Vec3::ONE,
            Arc::new(Lambertian::from_color(Vec3::splat(0.5))),
        ))
    }

    #[test]
    fn test_rotate_bbox_covers_rotated_corners() {
        let rotated = Rotate::y(unit_box(), 45.0);
        let bbox = rotated.bounding_box().unwrap();

        let m = Degrees::y(45.0).to_matrix();
        for corner in Aabb::from_points(Vec3::ZERO, Vec3::ONE).corners() {
            let p = m * corner;
            assert!(bbox.x.min - 1e-5 <= p.x && p.x <= bbox.x.max + 1e-5);
            assert!(bbox.y.min - 1e-5 <= p.y && p.y <= bbox.y.max + 1e-5);
            assert!(bbox.z.min - 1e-5 <= p.z && p.z <= bbox.z.max + 1e-5);
        }
    }

    #[test]
    fn test_rotate_hit_in_world_space() {
        // +X turns toward -Z under a 90 degree Y rotation, so the box now
        // occupies x in [0, 1], z in [-1, 0].
        let rotated = Rotate::y(unit_box(), 90.0);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), -Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(rotated.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_rotate_normal_faces_ray() {
        let angles = Degrees::new(15.0, 30.0, -20.0);
        let rotated = Rotate::new(unit_box(), angles);
        let center = angles.to_matrix() * Vec3::splat(0.5);
        let ray = Ray::new(center + 5.0 * Vec3::Y, -Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(rotated.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!(rec.normal.dot(ray.direction()) < 0.0);
        assert!((rec.normal.length() - 1.0).abs() < 1e-4);
    }
}
