//! Textures: functions from a surface point to a color.

use crate::error::{TextureError, TextureResult};
use crate::perlin::Perlin;
use crate::Color;
use cray_math::{Interval, Vec3};
use rand::RngCore;
use std::path::Path;
use std::sync::Arc;

/// Color returned by an image texture whose pixels failed to load.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// Trait for textures sampled by materials.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates (u, v) and world point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two child textures.
///
/// Cells are `scale` wide, so the pattern repeats every `2 * scale` along
/// each axis.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Decoded 8-bit RGB pixels, row-major with row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap an interleaved RGB buffer of `width * height * 3` bytes.
    pub fn from_rgb8(width: u32, height: u32, pixels: Vec<u8>) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() < width as usize * height as usize * 3 {
            return Err(TextureError::Empty(format!(
                "{}x{} image with {} bytes",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file into RGB8.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);
        Self::from_rgb8(width, height, rgb.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes of pixel (x, y), with coordinates clamped to the image.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 3] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }
}

/// Texture sampled from a bitmap via the surface (u, v) coordinates.
///
/// An image that failed to load is kept as an invalid texture that
/// renders as [`MISSING_TEXTURE_COLOR`] instead of aborting the render.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: Option<ImageData>,
}

impl ImageTexture {
    pub fn new(image: ImageData) -> Self {
        Self { image: Some(image) }
    }

    /// Load a texture from disk; failures are logged and yield an invalid
    /// texture.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ImageData::load(path) {
            Ok(image) => Self::new(image),
            Err(e) => {
                log::warn!("Could not load image texture {}: {}", path.display(), e);
                Self::invalid()
            }
        }
    }

    pub fn invalid() -> Self {
        Self { image: None }
    }

    pub fn is_valid(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        // Flip v so that v = 1 maps to the top row.
        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * image.width() as f32) as i64;
        let j = (v * image.height() as f32) as i64;
        let [r, g, b] = image.pixel(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

/// Marble-like procedural texture driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * self.noise.turb(p, 7)).sin())
    }
}
