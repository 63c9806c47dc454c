//! Per-thread random number generation.
//!
//! Every thread owns its own generator, so render workers never contend on
//! shared state. Workers reseed at the start of each image row when a render
//! seed is configured, which makes the output independent of how rows are
//! distributed across threads.

use std::cell::RefCell;
use std::f32::consts::PI;

use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::from_entropy());
}

/// Reset the calling thread's generator to a fixed seed.
pub fn reseed(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = StdRng::seed_from_u64(seed));
}

/// Run `f` with the calling thread's generator. Must not be nested.
pub(crate) fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn gen_f32() -> f32 {
    with_rng(|rng| rng.gen())
}

/// Uniform sample in `[min, max)`.
#[inline]
pub fn gen_range(min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32()
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub fn gen_index(len: usize) -> usize {
    with_rng(|rng| rng.gen_range(0..len))
}

/// Uniform point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere() -> Vec3 {
    with_rng(|rng| loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    })
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector() -> Vec3 {
    with_rng(|rng| loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = p.length_squared();
        if len_sq > 1e-12 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    })
}

/// Uniform point inside the unit disk on the XY plane.
pub fn random_in_unit_disk() -> Vec3 {
    with_rng(|rng| loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    })
}

/// Cosine-weighted direction about +Z.
pub fn random_cosine_direction() -> Vec3 {
    let (r1, r2): (f32, f32) = with_rng(|rng| (rng.gen(), rng.gen()));
    let phi = 2.0 * PI * r1;
    let sqrt_r2 = r2.sqrt();

    Vec3::new(phi.cos() * sqrt_r2, phi.sin() * sqrt_r2, (1.0 - r2).sqrt())
}

/// Direction about +Z inside the cone subtended by a sphere of `radius` at
/// squared distance `distance_squared`, uniform over its solid angle.
pub fn random_to_sphere(radius: f32, distance_squared: f32) -> Vec3 {
    let (r1, r2): (f32, f32) = with_rng(|rng| (rng.gen(), rng.gen()));
    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}
