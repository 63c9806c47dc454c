//! Axis-aligned box built from six rectangles.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::material::Material;
use crate::rect::AxisRect;
use crate::shape::{HitRecord, Shape, ShapeList};

/// Box between two corners. Every face carries the same material and an
/// outward normal along +axis, as produced by [`AxisRect`].
pub struct Cuboid {
    bottom: Vec3,
    top: Vec3,
    faces: ShapeList,
}

impl Cuboid {
    pub fn new(bottom: Vec3, top: Vec3, material: Arc<dyn Material>) -> Self {
        let mut faces = ShapeList::new();
        let (b, t) = (bottom, top);

        faces.add(Arc::new(AxisRect::xy(b.x, t.x, b.y, t.y, b.z, material.clone())));
        faces.add(Arc::new(AxisRect::xy(b.x, t.x, b.y, t.y, t.z, material.clone())));
        faces.add(Arc::new(AxisRect::xz(b.x, t.x, b.z, t.z, b.y, material.clone())));
        faces.add(Arc::new(AxisRect::xz(b.x, t.x, b.z, t.z, t.y, material.clone())));
        faces.add(Arc::new(AxisRect::yz(b.y, t.y, b.z, t.z, b.x, material.clone())));
        faces.add(Arc::new(AxisRect::yz(b.y, t.y, b.z, t.z, t.x, material)));

        Self { bottom, top, faces }
    }
}

impl Shape for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        self.faces.hit(ray, ray_t, rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(Aabb::from_points(self.bottom, self.top))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.faces.pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        self.faces.random_direction(origin)
    }
}
