//! Texture lookups for materials.
//!
//! A texture maps surface parameters `(u, v)` and the hit point to a color.
//! Materials hold textures behind `Arc<dyn Texture>` so one texture can be
//! shared by many materials and read from every render thread.

use std::path::Path;
use std::sync::Arc;

use ember_math::Vec3;
use thiserror::Error;

/// Linear RGB color.
pub type Color = Vec3;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to open texture {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    Empty(String),

    #[error("texture is {width}x{height} but holds {pixels} pixels")]
    Dimensions { width: u32, height: u32, pixels: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Color lookup at a surface point. Must be a pure function of its inputs.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// Solid 3D checker pattern driven by the hit point, not by UV.
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Texture sampled from a decoded image.
///
/// Pixels are stored as linear RGB, row-major, with row 0 at the top of the
/// image. UV coordinates are clamped to `[0, 1]` and `v = 0` is the bottom row.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl ImageTexture {
    /// Create a texture from linear pixel data in row-major order, top row
    /// first. Both dimensions must be non-zero and match `pixels`.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Err(TextureError::Dimensions {
                width,
                height,
                pixels: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load and decode an image file (any format the `image` crate reads).
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Open {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }

        let pixels = rgb
            .pixels()
            .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
            .collect();

        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bilinear lookup at clamped UV coordinates.
    fn sample(&self, u: f32, v: f32) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0); // Flip V to image rows

        let x = u * (self.width as f32 - 1.0);
        let y = v * (self.height as f32 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let top = self.pixel(x0, y0).lerp(self.pixel(x1, y0), fx);
        let bottom = self.pixel(x0, y1).lerp(self.pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .map(|&[r, g, b]| Color::new(r, g, b))
            .unwrap_or(Color::new(0.0, 1.0, 1.0))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        self.sample(u, v)
    }
}

/// Convert an sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_ignores_inputs() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.7, 0.2, Vec3::splat(9.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates() {
        let tex = CheckerTexture::from_colors(Color::ONE, Color::ZERO);

        // sin(1)^3 > 0 -> even
        let p_even = Vec3::splat(0.1);
        assert_eq!(tex.value(0.0, 0.0, p_even), Color::ONE);

        // sin(-1) * sin(1) * sin(1) < 0 -> odd
        let p_odd = Vec3::new(-0.1, 0.1, 0.1);
        assert_eq!(tex.value(0.0, 0.0, p_odd), Color::ZERO);
    }

    #[test]
    fn test_image_texture_corners() {
        // 2x2: top row red/green, bottom row blue/white
        let tex = ImageTexture::new(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
            ],
        )
        .unwrap();

        assert_eq!(tex.value(0.0, 1.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(1.0, 1.0, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(1.0, 0.0, Vec3::ZERO), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_image_texture_clamps_uv() {
        let tex = ImageTexture::new(1, 1, vec![[0.25, 0.5, 0.75]]).unwrap();
        assert_eq!(tex.value(-3.0, 7.0, Vec3::ZERO), Color::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn test_image_texture_rejects_bad_dimensions() {
        assert!(matches!(
            ImageTexture::new(0, 1, Vec::new()),
            Err(TextureError::Dimensions { width: 0, .. })
        ));
        assert!(matches!(
            ImageTexture::new(2, 2, vec![[0.0; 3]; 3]),
            Err(TextureError::Dimensions { pixels: 3, .. })
        ));
    }

    #[test]
    fn test_image_texture_missing_file() {
        let err = ImageTexture::open("does/not/exist.png").unwrap_err();
        assert!(matches!(err, TextureError::Open { .. }));
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        let mid = srgb_to_linear(128);
        assert!(mid < 0.5 && mid > 0.1);
    }
}
