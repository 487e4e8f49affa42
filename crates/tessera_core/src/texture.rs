//! Textures sampled by materials.
//!
//! Every texture answers `value(u, v, p)`; image data is decoded once at
//! load time with the `image` crate and stored as linear float RGB.

use std::path::Path;
use std::sync::Arc;

use tessera_math::{Color, Point3};
use thiserror::Error;

use crate::perlin::Perlin;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Color lookup by surface coordinates and hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// Constant color.
#[derive(Clone, Copy, Debug)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.color
    }
}

/// 3D checker pattern from the sign of `sin(10x) sin(10y) sin(10z)`.
#[derive(Clone)]
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
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like turbulence driven by Perlin noise.
#[derive(Clone, Debug)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    /// Octaves of turbulence added to the phase.
    const TURBULENCE_DEPTH: usize = 7;

    pub fn new(noise: Perlin, scale: f64) -> Self {
        Self { noise, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, Self::TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// Nearest-neighbour image lookup.
///
/// An image that failed to load has no pixels and samples as solid magenta.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    /// Row-major RGB in `[0, 1]`, row 0 at the top of the image.
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Debug color returned when no image data is available.
    pub const MISSING_COLOR: Color = Color::new(1.0, 0.0, 1.0);

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> TextureResult<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::LoadError(format!(
                "expected {}x{} pixels, got {}",
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

    /// Decode an image file.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TextureError::LoadError(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let scale = 1.0 / 255.0;
        let pixels = rgb
            .pixels()
            .map(|p| Color::new(p[0] as f64, p[1] as f64, p[2] as f64) * scale)
            .collect();

        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);
        Self::from_pixels(width, height, pixels)
    }

    /// Like [`ImageTexture::open`] but logs failures and returns an empty
    /// texture that samples as [`ImageTexture::MISSING_COLOR`].
    pub fn open_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!(
                    "Could not load texture image {}: {}; using debug color",
                    path.display(),
                    e
                );
                Self {
                    width: 0,
                    height: 0,
                    pixels: Vec::new(),
                }
            }
        }
    }

    pub fn is_missing(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        if self.is_missing() {
            return Self::MISSING_COLOR;
        }

        let u = u.clamp(0.0, 1.0);
        // Flip v to image coordinates.
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f64) as u32).min(self.width - 1);
        let j = ((v * self.height as f64) as u32).min(self.height - 1);

        self.pixels[(j * self.width + i) as usize]
    }
}
