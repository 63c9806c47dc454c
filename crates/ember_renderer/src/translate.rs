//! Translation decorator.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::shape::{HitRecord, Shape};

/// Moves a shape by a fixed offset.
///
/// The incoming ray is moved into object space instead of moving the
/// geometry. Normals and the front/back flag are unchanged by a
/// translation, so they are passed through as the inner shape reports them.
pub struct Translate {
    shape: Arc<dyn Shape>,
    offset: Vec3,
}

impl Translate {
    pub fn new(shape: Arc<dyn Shape>, offset: Vec3) -> Self {
        Self { shape, offset }
    }
}

impl Shape for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction());
        if !self.shape.hit(&moved, ray_t, rec) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.shape
            .bounding_box()
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.shape.pdf_value(origin - self.offset, direction)
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        self.shape.random_direction(origin - self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::rect::AxisRect;
    use crate::sphere::Sphere;

    fn unit_sphere() -> Arc<dyn Shape> {
        Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::from_color(Vec3::splat(0.5))),
        ))
    }

    #[test]
    fn test_translate_hit_point_moves() {
        let moved = Translate::new(unit_sphere(), Vec3::new(10.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(10.0, 0.0, 5.0), -Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(moved.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_translate_keeps_back_face() {
        let moved = Translate::new(unit_sphere(), Vec3::new(0.0, 3.0, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::X);

        let mut rec = HitRecord::default();
        assert!(moved.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!(!rec.front_face);
        assert!((rec.normal - -Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_translate_bbox() {
        let moved = Translate::new(unit_sphere(), Vec3::new(1.0, 2.0, 3.0));
        let bbox = moved.bounding_box().unwrap();
        assert_eq!(bbox.min(), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(bbox.max(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_translate_forwards_pdf() {
        let light = Arc::new(AxisRect::xy(
            -0.5,
            0.5,
            -0.5,
            0.5,
            0.0,
            Arc::new(Lambertian::from_color(Vec3::ONE)),
        ));
        let moved = Translate::new(light, Vec3::new(0.0, 0.0, -1.0));

        let pdf = moved.pdf_value(Vec3::ZERO, -Vec3::Z);
        assert!((pdf - 1.0).abs() < 1e-4);
    }
}
