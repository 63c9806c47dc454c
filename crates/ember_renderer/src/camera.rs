//! Camera for ray generation.

use ember_math::{Ray, Vec3};

use crate::random;

/// Anything that can turn normalized image coordinates into primary rays.
///
/// `u` runs left to right and `v` bottom to top, both over `[0, 1]`.
pub trait RayGenerator: Send + Sync {
    fn generate_ray(&self, u: f32, v: f32) -> Ray;
}

/// Thin-lens pinhole camera with an image plane at the focus distance.
#[derive(Clone, Debug)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Image width / height
    focus_dist: f32,   // Distance from camera to plane of perfect focus
    lens_radius: f32,

    // Cached computed values (set by initialize())
    x_axis: Vec3,
    y_axis: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    lower_left_corner: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            focus_dist: 1.0,
            lens_radius: 0.0,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.focus_dist = focus_dist;
        self
    }

    /// Lens diameter. Zero gives a pinhole camera.
    pub fn with_aperture(mut self, aperture: f32) -> Self {
        self.lens_radius = aperture.max(0.0) / 2.0;
        self
    }

    pub fn with_aspect(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        let film_height = 2.0 * (self.vfov.to_radians() / 2.0).tan();
        let film_width = self.aspect_ratio * film_height;

        let look_direction = (self.look_at - self.look_from).normalize();
        self.x_axis = look_direction.cross(self.vup).normalize();
        self.y_axis = self.x_axis.cross(look_direction).normalize();

        self.horizontal = self.x_axis * film_width * self.focus_dist;
        self.vertical = self.y_axis * film_height * self.focus_dist;
        self.lower_left_corner = self.look_from + self.focus_dist * look_direction
            - self.horizontal / 2.0
            - self.vertical / 2.0;

        log::debug!(
            "Camera: from {} to {}, vfov {}, aspect {:.3}, lens radius {}",
            self.look_from,
            self.look_at,
            self.vfov,
            self.aspect_ratio,
            self.lens_radius
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl RayGenerator for Camera {
    fn generate_ray(&self, u: f32, v: f32) -> Ray {
        let origin = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random::random_in_unit_disk();
            self.look_from + rd.x * self.x_axis + rd.y * self.y_axis
        } else {
            self.look_from
        };

        let target = self.lower_left_corner + u * self.horizontal + v * self.vertical;
        Ray::new(origin, target - origin)
    }
}
