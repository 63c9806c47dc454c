//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Onb, Ray, Vec3};

use crate::material::Material;
use crate::random;
use crate::shape::{HitRecord, Shape};

/// A sphere primitive. Also usable as a light for importance sampling.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// UV coordinates for a point on the unit sphere centered at the origin.
    ///
    /// `u` is the azimuth around Y measured from -X, `v` the polar angle
    /// from -Y, both scaled to `[0, 1]`.
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Shape for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in range, else the farther one
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    /// Uniform density over the cone of directions that see the sphere.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let mut rec = HitRecord::default();
        if !self.hit(
            &Ray::new(origin, direction),
            Interval::new(0.001, f32::INFINITY),
            &mut rec,
        ) {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared)
            .max(0.0)
            .sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn random_direction(&self, origin: Vec3) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let uvw = Onb::from_w(direction);

        uvw.local(random::random_to_sphere(self.radius, distance_squared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn grey_sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::from_color(Vec3::new(0.5, 0.5, 0.5))),
        )
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = grey_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_hit_from_outside_toward_center() {
        let center = Vec3::new(3.0, -2.0, 7.0);
        let radius = 1.5;
        let sphere = grey_sphere(center, radius);

        for origin in [
            Vec3::new(-4.0, 1.0, 0.0),
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(3.0, -2.0, -20.0),
        ] {
            let ray = Ray::new(origin, center - origin);
            let mut rec = HitRecord::default();
            assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

            let distance = (rec.p - origin).length();
            assert!((distance - ((origin - center).length() - radius)).abs() < 1e-3);

            assert!((rec.normal.length() - 1.0).abs() < 1e-4);
            let radial = (rec.p - center).normalize();
            assert!(rec.normal.dot(radial).abs() > 0.9999);
        }
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = grey_sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(!rec.front_face);
        assert!((rec.normal - -Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = grey_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_sphere_uv_ranges() {
        let (u, v) = Sphere::sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (_, v_top) = Sphere::sphere_uv(Vec3::Y);
        assert!((v_top - 1.0).abs() < 1e-5);

        let (_, v_bottom) = Sphere::sphere_uv(-Vec3::Y);
        assert!(v_bottom.abs() < 1e-5);
    }

    #[test]
    fn test_sphere_bounding_box() {
        let sphere = grey_sphere(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let bbox = sphere.bounding_box().unwrap();
        assert_eq!(bbox.min(), Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max(), Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_sphere_pdf_matches_solid_angle() {
        random::reseed(11);
        let sphere = grey_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let origin = Vec3::ZERO;

        let cos_theta_max = (1.0f32 - 1.0 / 25.0).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_theta_max));

        // Grazing samples may miss by rounding; nearly all must land.
        let matching = (0..100)
            .filter(|_| {
                let direction = sphere.random_direction(origin);
                let pdf = sphere.pdf_value(origin, direction);
                (pdf - expected).abs() / expected < 1e-3
            })
            .count();
        assert!(matching >= 95);

        assert_eq!(sphere.pdf_value(origin, Vec3::Z), 0.0);
    }
}
