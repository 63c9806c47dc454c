//! Probability densities over directions, used for importance sampling.
//!
//! A [`Pdf`] can both draw a direction and report the density of any
//! direction. The integrator divides by that density, so `value` must match
//! the distribution `generate` actually draws from.

use std::f32::consts::PI;

use ember_math::{Onb, Vec3};

use crate::random;
use crate::shape::Shape;

/// Density over directions.
pub trait Pdf {
    /// Density of `direction` (solid-angle measure). Never negative.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction from this distribution. Need not be unit length.
    fn generate(&self) -> Vec3;
}

/// Cosine-weighted hemisphere about a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w);
        if cosine <= 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }

    fn generate(&self) -> Vec3 {
        let direction = self.uvw.local(random::random_cosine_direction());

        // Catch degenerate directions
        if direction.length_squared() < 1e-8 {
            self.uvw.w
        } else {
            direction
        }
    }
}

/// Directions toward a shape, as seen from `origin`.
pub struct ShapePdf<'a> {
    shape: &'a dyn Shape,
    origin: Vec3,
}

impl<'a> ShapePdf<'a> {
    pub fn new(shape: &'a dyn Shape, origin: Vec3) -> Self {
        Self { shape, origin }
    }
}

impl Pdf for ShapePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.shape.pdf_value(self.origin, direction)
    }

    fn generate(&self) -> Vec3 {
        self.shape.random_direction(self.origin)
    }
}

/// Equal-weight mixture of two densities.
pub struct MixturePdf<'a> {
    first: &'a dyn Pdf,
    second: &'a dyn Pdf,
}

impl<'a> MixturePdf<'a> {
    pub fn new(first: &'a dyn Pdf, second: &'a dyn Pdf) -> Self {
        Self { first, second }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.first.value(direction) + 0.5 * self.second.value(direction)
    }

    fn generate(&self) -> Vec3 {
        if random::gen_f32() < 0.5 {
            self.first.generate()
        } else {
            self.second.generate()
        }
    }
}
