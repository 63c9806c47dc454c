//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based offline rendering:
//!
//! - **Geometry**: spheres, axis-aligned rectangles and boxes, plus
//!   translate / rotate / flip-face / participating-medium decorators
//! - **Acceleration**: an arena-backed BVH built once per scene
//! - **Materials**: Lambertian, metal, dielectric, diffuse lights, isotropic
//! - **Importance sampling**: cosine, shape and mixture densities
//! - **Scheduling**: row slices rendered on a fixed thread pool with a
//!   shared progress counter

mod bvh;
mod camera;
mod cuboid;
mod error;
mod flip_face;
mod integrator;
mod material;
mod medium;
mod pdf;
pub mod random;
mod rect;
mod rotate;
mod scene;
mod scheduler;
mod shape;
mod sphere;
mod translate;

pub use bvh::Bvh;
pub use camera::{Camera, RayGenerator};
pub use cuboid::Cuboid;
pub use error::{RenderError, RenderResult, SceneError, SceneResult};
pub use flip_face::FlipFace;
pub use integrator::{scrub_nan, PathIntegrator, RussianRoulette, T_MIN};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterKind, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, MixturePdf, Pdf, ShapePdf};
pub use rect::{AxisRect, Plane, THICKNESS};
pub use rotate::Rotate;
pub use scene::Scene;
pub use scheduler::{render, row_slices, tone_map, Progress, RenderConfig, RenderStats, RowSlice};
pub use shape::{HitRecord, Shape, ShapeList};
pub use sphere::Sphere;
pub use translate::Translate;

/// Re-export common types from the math and core crates
pub use ember_core::Color;
pub use ember_math::{Aabb, Degrees, Interval, Ray, Vec3};
