//! Participating media of constant density.

use std::sync::Arc;

use ember_core::{Color, SolidColor, Texture};
use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::material::Isotropic;
use crate::random;
use crate::shape::{HitRecord, Shape};

/// Offset past the entry point when searching for the exit crossing.
const EXIT_EPSILON: f32 = 0.0001;

/// Fog or smoke filling a closed boundary shape.
///
/// A ray entering the boundary travels an exponentially distributed
/// distance before it scatters. If that distance exceeds the path length
/// inside the boundary the ray passes through untouched.
pub struct ConstantMedium {
    boundary: Arc<dyn Shape>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Shape>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }

    pub fn from_color(boundary: Arc<dyn Shape>, density: f32, albedo: Color) -> Self {
        Self::new(boundary, density, Arc::new(SolidColor::new(albedo)))
    }
}

impl Shape for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut entry = HitRecord::default();
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry) {
            return false;
        }

        let mut exit = HitRecord::default();
        if !self.boundary.hit(
            ray,
            Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY),
            &mut exit,
        ) {
            return false;
        }

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }

        // Origin inside the medium
        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * random::gen_f32().ln();
        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        rec.normal = Vec3::X; // arbitrary
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase_function;

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.boundary.bounding_box()
    }
}
