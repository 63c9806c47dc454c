//! Recursive Monte Carlo path integrator.
//!
//! Diffuse bounces are importance sampled from an equal mixture of the
//! material's own density and a density toward the scene's lights. Paths
//! end at the depth limit, on a miss, on absorption, or by Russian roulette.

use std::f32::consts::PI;

use ember_core::Color;
use ember_math::{Interval, Ray};

use crate::material::ScatterKind;
use crate::pdf::{MixturePdf, Pdf, ShapePdf};
use crate::random;
use crate::shape::{HitRecord, Shape};

/// Near limit for secondary rays, avoids self-intersection ("shadow acne").
pub const T_MIN: f32 = 0.001;

/// Densities below this are treated as unsampleable.
const PDF_EPSILON: f32 = 1e-8;

/// Probabilistic path termination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RussianRoulette {
    continue_probability: f32,
}

impl RussianRoulette {
    /// `continue_probability` is clamped to `(0, 1]`; `1.0` disables the
    /// roulette.
    pub fn new(continue_probability: f32) -> Self {
        Self {
            continue_probability: continue_probability.clamp(f32::EPSILON, 1.0),
        }
    }

    pub fn continue_probability(&self) -> f32 {
        self.continue_probability
    }

    /// Decide the fate of a path from a uniform draw `xi` in `[0, 1)`.
    ///
    /// Returns the weight `1 / p` that keeps the estimate unbiased when the
    /// path continues, or `None` when it is terminated.
    pub fn survive(&self, xi: f32) -> Option<f32> {
        if xi < self.continue_probability {
            Some(1.0 / self.continue_probability)
        } else {
            None
        }
    }
}

impl Default for RussianRoulette {
    fn default() -> Self {
        Self::new(0.8)
    }
}

/// Path tracing radiance estimator.
#[derive(Debug, Clone, Copy)]
pub struct PathIntegrator {
    background: Color,
    roulette: RussianRoulette,
}

impl PathIntegrator {
    pub fn new(background: Color, roulette: RussianRoulette) -> Self {
        Self {
            background,
            roulette,
        }
    }

    /// Estimate the radiance arriving along `ray`.
    ///
    /// `lights` is sampled directly on diffuse bounces; without it only the
    /// material density is used.
    pub fn radiance(
        &self,
        ray: &Ray,
        world: &dyn Shape,
        lights: Option<&dyn Shape>,
        depth: u32,
    ) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(weight) = self.roulette.survive(random::gen_f32()) else {
            return Color::ZERO;
        };

        let mut rec = HitRecord::default();
        if !world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
            return self.background * weight;
        }

        let emitted = rec.material.emitted(&rec, rec.u, rec.v, rec.p);
        let Some(srec) = rec.material.scatter(ray, &rec) else {
            return emitted * weight;
        };

        match srec.kind {
            ScatterKind::Specular(specular_ray) => {
                srec.attenuation * self.radiance(&specular_ray, world, lights, depth - 1) * weight
            }
            ScatterKind::Sampled(material_pdf) => {
                let (direction, density) = match lights {
                    Some(lights) => {
                        let light_pdf = ShapePdf::new(lights, rec.p);
                        let mixture = MixturePdf::new(&light_pdf, material_pdf.as_ref());
                        let direction = mixture.generate();
                        (direction, mixture.value(direction))
                    }
                    None => {
                        let direction = material_pdf.generate();
                        (direction, material_pdf.value(direction))
                    }
                };

                // Also rejects NaN
                if !(density >= PDF_EPSILON) {
                    return emitted * weight;
                }

                let scattered = Ray::new(rec.p, direction);
                let cosine = direction.normalize().dot(rec.normal).max(0.0);
                let incoming = self.radiance(&scattered, world, lights, depth - 1);

                ((srec.attenuation / PI) * incoming * cosine / density + emitted) * weight
            }
        }
    }
}

/// Replace NaN channels with zero.
#[inline]
pub fn scrub_nan(color: Color) -> Color {
    Color::new(
        if color.x.is_nan() { 0.0 } else { color.x },
        if color.y.is_nan() { 0.0 } else { color.y },
        if color.z.is_nan() { 0.0 } else { color.z },
    )
}
