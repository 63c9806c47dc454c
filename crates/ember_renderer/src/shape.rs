//! Shape trait, hit records and the linear shape aggregate.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::material::{Material, ScatterRecord};
use crate::random;

/// A dummy material used for `HitRecord::default()`.
/// Always absorbs light.
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord) -> Option<ScatterRecord> {
        None
    }
}

static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-shape intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, facing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface parameterization
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Store `outward_normal` so that it faces against the ray and remember
    /// which side was hit. `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Geometry that can be intersected, bounded, and optionally sampled as a
/// light source.
pub trait Shape: Send + Sync {
    /// Test if a ray hits this shape with `t` inside `ray_t`.
    ///
    /// On a hit the record is overwritten and `true` is returned; on a miss
    /// the record is left untouched.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Axis-aligned bounds, or `None` for unbounded shapes.
    fn bounding_box(&self) -> Option<Aabb>;

    /// Solid-angle density of sampling `direction` from `origin` toward this
    /// shape. Shapes that cannot be sampled report zero.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Random direction from `origin` toward this shape.
    fn random_direction(&self, _origin: Vec3) -> Vec3 {
        Vec3::X
    }
}

/// Ordered collection of shared shapes, intersected by linear scan.
#[derive(Clone, Default)]
pub struct ShapeList {
    objects: Vec<Arc<dyn Shape>>,
}

impl ShapeList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn add(&mut self, object: Arc<dyn Shape>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<dyn Shape>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<Arc<dyn Shape>>> for ShapeList {
    fn from(objects: Vec<Arc<dyn Shape>>) -> Self {
        Self { objects }
    }
}

impl Shape for ShapeList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let (first, rest) = self.objects.split_first()?;
        rest.iter().try_fold(first.bounding_box()?, |acc, object| {
            Some(Aabb::surrounding(&acc, &object.bounding_box()?))
        })
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }

        self.objects[random::gen_index(self.objects.len())].random_direction(origin)
    }
}
