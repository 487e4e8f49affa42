//! User-facing render settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::film::{Film, DEFAULT_TILE_SIZE};
use crate::integrator::Integrator;
use crate::scheduler::TileScheduler;

/// Everything needed to turn a built-in scene into an image.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Built-in scene id
    pub scene: u32,
    /// Maximum ray bounce depth
    pub max_depth: i32,
    pub samples_per_pixel: u32,
    /// Tile edge in pixels
    pub tile_size: u32,
    /// Worker threads; 0 uses every available core
    pub threads: usize,
    /// Seed for the BVH build and every tile RNG
    pub seed: u64,
    pub image_width: u32,
    /// Periodically write a preview image while rendering
    pub preview: bool,
    pub output: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scene: 0,
            max_depth: 5,
            samples_per_pixel: 10,
            tile_size: DEFAULT_TILE_SIZE,
            threads: 0,
            seed: 0,
            image_width: 800,
            preview: false,
            output: PathBuf::from("output/result.png"),
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.tile_size == 0 {
            return Err(RenderError::InvalidSettings(
                "tile_size must be at least 1".into(),
            ));
        }
        if self.image_width == 0 {
            return Err(RenderError::InvalidSettings(
                "image_width must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Image height for a camera with the given aspect ratio, rounded, at least 1.
    pub fn image_height(&self, aspect_ratio: f64) -> u32 {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return self.image_width;
        }
        ((self.image_width as f64 / aspect_ratio).round() as u32).max(1)
    }

    pub fn film(&self, aspect_ratio: f64) -> Film {
        Film::new(self.image_width, self.image_height(aspect_ratio), self.tile_size)
    }

    pub fn integrator(&self) -> Integrator {
        Integrator::new(self.max_depth, self.samples_per_pixel)
    }

    pub fn scheduler(&self) -> TileScheduler {
        TileScheduler::new(self.threads, self.seed)
    }
}
