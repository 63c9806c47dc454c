//! Front/back flag inversion.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::shape::{HitRecord, Shape};

/// Inverts which side of the wrapped shape counts as the front face.
///
/// Only `front_face` is toggled; the stored normal still faces the incoming
/// ray. Used to make a one-sided light emit toward the other side.
pub struct FlipFace {
    shape: Arc<dyn Shape>,
}

impl FlipFace {
    pub fn new(shape: Arc<dyn Shape>) -> Self {
        Self { shape }
    }
}

impl Shape for FlipFace {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.shape.hit(ray, ray_t, rec) {
            return false;
        }

        rec.front_face = !rec.front_face;
        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.shape.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.shape.pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        self.shape.random_direction(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DiffuseLight;
    use crate::rect::AxisRect;

    fn ceiling_light() -> Arc<dyn Shape> {
        Arc::new(AxisRect::xz(
            -1.0,
            1.0,
            -1.0,
            1.0,
            2.0,
            Arc::new(DiffuseLight::from_color(Vec3::splat(15.0))),
        ))
    }

    #[test]
    fn test_flip_face_toggles_front_face() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let range = Interval::new(0.001, f32::INFINITY);

        let plain = ceiling_light();
        let mut rec = HitRecord::default();
        assert!(plain.hit(&ray, range, &mut rec));
        assert!(!rec.front_face);
        let normal = rec.normal;

        let flipped = FlipFace::new(ceiling_light());
        let mut rec = HitRecord::default();
        assert!(flipped.hit(&ray, range, &mut rec));
        assert!(rec.front_face);
        assert_eq!(rec.normal, normal);
    }

    #[test]
    fn test_flip_face_forwards_bbox_and_pdf() {
        let inner = ceiling_light();
        let flipped = FlipFace::new(inner.clone());

        assert_eq!(flipped.bounding_box(), inner.bounding_box());
        assert_eq!(
            flipped.pdf_value(Vec3::ZERO, Vec3::Y),
            inner.pdf_value(Vec3::ZERO, Vec3::Y)
        );
        assert!(flipped.pdf_value(Vec3::ZERO, Vec3::Y) > 0.0);
    }
}
