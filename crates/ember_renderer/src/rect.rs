//! Axis-aligned rectangles.
//!
//! A rectangle lies in one of the three coordinate planes at a fixed offset
//! `k` along the remaining axis. Its outward normal points along +axis. The
//! bounding box is padded by [`THICKNESS`] along the normal axis so slab
//! tests never see a zero-width box.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::material::Material;
use crate::random;
use crate::shape::{HitRecord, Shape};

/// Padding applied to the bounding box along the rectangle's normal axis.
pub const THICKNESS: f32 = 0.0001;

/// Coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// `(first free axis, second free axis, normal axis)`.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }

    /// Point with free coordinates `(a, b)` and fixed coordinate `k`.
    fn point(self, a: f32, b: f32, k: f32) -> Vec3 {
        let (ia, ib, ik) = self.axes();
        let mut p = Vec3::ZERO;
        p[ia] = a;
        p[ib] = b;
        p[ik] = k;
        p
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` in `plane` at offset `k`.
pub struct AxisRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    /// Rectangle spanning `x0..x1` by `y0..y1` at `z = k`.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle spanning `x0..x1` by `z0..z1` at `y = k`.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle spanning `y0..y1` by `z0..z1` at `x = k`.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, (y0, y1), (z0, z1), k, material)
    }

    /// Rectangle given by its center and side lengths on the free axes.
    pub fn centered(
        plane: Plane,
        (a_mid, a_len): (f32, f32),
        (b_mid, b_len): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let (a_half, b_half) = (a_len / 2.0, b_len / 2.0);
        Self::new(
            plane,
            (a_mid - a_half, a_mid + a_half),
            (b_mid - b_half, b_mid + b_half),
            k,
            material,
        )
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    fn outward_normal(&self) -> Vec3 {
        let (_, _, ik) = self.plane.axes();
        let mut n = Vec3::ZERO;
        n[ik] = 1.0;
        n
    }
}

impl Shape for AxisRect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        let t = (self.k - origin[ik]) / direction[ik];
        if !ray_t.surrounds(t) {
            return false;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return false;
        }

        rec.u = (a - self.a0) / (self.a1 - self.a0);
        rec.v = (b - self.b0) / (self.b1 - self.b0);
        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.outward_normal());
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let (_, _, ik) = self.plane.axes();
        let lo = self.plane.point(self.a0, self.b0, self.k);
        let hi = self.plane.point(self.a1, self.b1, self.k);

        Some(Aabb::from_points(lo, hi).padded_along(ik, THICKNESS))
    }

    /// Area density converted to solid angle: `distance² / (cos * area)`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let mut rec = HitRecord::default();
        if !self.hit(
            &Ray::new(origin, direction),
            Interval::new(0.001, f32::INFINITY),
            &mut rec,
        ) {
            return 0.0;
        }

        let length = direction.length();
        let distance_squared = rec.t * rec.t * length * length;
        let cosine = (direction.dot(rec.normal) / length).abs();
        if cosine < 1e-8 {
            return 0.0;
        }

        distance_squared / (cosine * self.area())
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        let target = self.plane.point(
            random::gen_range(self.a0, self.a1),
            random::gen_range(self.b0, self.b1),
            self.k,
        );
        target - origin
    }
}
