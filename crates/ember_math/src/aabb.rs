use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used to prune ray queries.
///
/// Stored as one interval per axis. A box may be flat along an axis (zero
/// thickness); shapes that are planar pad themselves before handing out a
/// box so that slab tests stay well defined.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Box spanned by two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Union of two boxes: component-wise min of minima, max of maxima.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Interval for axis `n` (0 = X, 1 = Y, 2 = Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Copy of the box grown by `thickness` along a single axis.
    pub fn padded_along(&self, axis: usize, thickness: f32) -> Aabb {
        let mut padded = *self;
        match axis {
            0 => padded.x = padded.x.expand(2.0 * thickness),
            1 => padded.y = padded.y.expand(2.0 * thickness),
            _ => padded.z = padded.z.expand(2.0 * thickness),
        }
        padded
    }

    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Slab test against the parameter range `ray_t`.
    ///
    /// The two slab parameters are ordered with `min`/`max` instead of
    /// checking the sign of the direction. A zero direction component gives
    /// infinite parameters, which the float comparisons handle as-is.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = r.origin[axis];
            let direction = r.direction[axis];

            let t0 = (slab.min - origin) / direction;
            let t1 = (slab.max - origin) / direction;

            t_min = t0.min(t1).max(t_min);
            t_max = t0.max(t1).min(t_max);
            if t_max <= t_min {
                return false;
            }
        }

        true
    }

    /// Index of the axis with the largest extent.
    ///
    /// Ties follow the comparison chain below: x wins a tie with y or z, and
    /// a y/z tie returns y (1), not z.
    pub fn longest_axis(&self) -> usize {
        let dx = self.x.size();
        let dy = self.y.size();
        let dz = self.z.size();

        if dx < dy {
            if dy < dz {
                2
            } else {
                1
            }
        } else if dx < dz {
            2
        } else {
            0
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(aabb.min(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max(), Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_surrounding_contains_both() {
        let boxes = [
            Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0)),
            Aabb::from_points(Vec3::new(3.0, -3.0, 3.0), Vec3::new(10.0, 1.0, 4.0)),
            Aabb::from_points(Vec3::new(-7.0, 2.0, 2.0), Vec3::new(-6.0, 2.0, 9.0)),
        ];

        for a in &boxes {
            for b in &boxes {
                let union = Aabb::surrounding(a, b);
                assert!(union.min().cmple(a.min()).all());
                assert!(union.min().cmple(b.min()).all());
                assert!(union.max().cmpge(a.max()).all());
                assert!(union.max().cmpge(b.max()).all());
            }
        }
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let range = Interval::new(0.0, 100.0);

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&toward, range));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&away, range));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.hit(&beside, range));
    }

    #[test]
    fn test_aabb_hit_negative_direction_components() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(4.0, 4.0, 4.0), Vec3::new(-1.0, -1.0, -1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_hit_respects_range() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
        assert!(!aabb.hit(&ray, Interval::new(7.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_flat_box_with_parallel_ray() {
        // Zero direction components produce infinite slab parameters.
        let flat = Aabb::from_points(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0))
            .padded_along(2, 0.0001);
        let inside = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::X);
        assert!(flat.hit(&inside, Interval::new(-10.0, 10.0)));

        let above = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        assert!(!flat.hit(&above, Interval::new(-10.0, 10.0)));
    }

    #[test]
    fn test_aabb_padded_along() {
        let flat = Aabb::from_points(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let padded = flat.padded_along(1, 0.001);

        assert!((padded.y.min - 1.999).abs() < 1e-6);
        assert!((padded.y.max - 2.001).abs() < 1e-6);
        assert_eq!(padded.x, flat.x);
    }

    #[test]
    fn test_aabb_longest_axis() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).longest_axis(), 2);
    }

    #[test]
    fn test_aabb_longest_axis_ties() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 4.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 4.0, 4.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::splat(3.0)).longest_axis(), 0);
    }

    #[test]
    fn test_aabb_translate() {
        let moved = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(moved.min(), Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(moved.max(), Vec3::new(6.0, 1.0, 0.0));
    }
}
