//! Render-ready scene: the accelerated world plus optional light shapes.

use std::sync::Arc;

use crate::bvh::Bvh;
use crate::error::SceneResult;
use crate::shape::Shape;

/// Immutable scene shared by all render workers.
pub struct Scene {
    world: Bvh,
    lights: Option<Arc<dyn Shape>>,
}

impl Scene {
    /// Build the BVH over `shapes`. Fails if any shape is unbounded.
    pub fn build(shapes: Vec<Arc<dyn Shape>>) -> SceneResult<Self> {
        let world = Bvh::build(shapes)?;
        log::info!(
            "Scene ready: {} shapes, {} BVH nodes",
            world.len(),
            world.node_count()
        );

        Ok(Self {
            world,
            lights: None,
        })
    }

    /// Shapes to sample directly on diffuse bounces. They must also be part
    /// of the world to be visible.
    pub fn with_lights(mut self, lights: Arc<dyn Shape>) -> Self {
        self.lights = Some(lights);
        self
    }

    pub fn world(&self) -> &Bvh {
        &self.world
    }

    pub fn lights(&self) -> Option<&dyn Shape> {
        self.lights.as_deref()
    }
}
