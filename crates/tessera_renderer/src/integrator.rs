//! Core path tracing estimator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a hard depth cutoff
//! - Anti-aliasing via multi-sampling
//! - Clamping and gamma correction on output

use crate::film::{quantize, FilmTile, CHANNELS};
use crate::sampler::{Sampler, UniformSampler};
use crate::scene::Scene;
use rand::RngCore;
use tessera_math::{Color, Interval, Ray};

/// Smallest accepted hit distance; keeps bounced rays off their own surface.
pub const T_MIN: f64 = 0.0001;

/// Compute the radiance arriving along `ray`.
///
/// `depth` is the number of bounces still allowed. There is no Russian
/// roulette: a path ends when `depth` reaches zero, when it escapes to the
/// background, or when a material stops scattering.
pub fn li(ray: &Ray, scene: &Scene, depth: i32, rng: &mut dyn RngCore) -> Color {
    if depth <= 0 {
        return Color::ZERO;
    }

    let Some(isect) = scene.intersect_p(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return scene.background();
    };

    // Builders only accept registered material ids.
    let material = match scene.material(isect.material) {
        Ok(material) => material,
        Err(e) => panic!("primitive {:?} hit with no material: {}", isect.primitive, e),
    };

    let emitted = material.emitted(isect.uv.x, isect.uv.y, isect.point);
    match material.scatter(ray, &isect, rng) {
        Some(rec) => emitted + rec.attenuation * li(&rec.scattered, scene, depth - 1, rng),
        None => emitted,
    }
}

/// Per-pixel estimator settings plus the sampler that jitters each sample.
pub struct Integrator {
    max_depth: i32,
    samples_per_pixel: u32,
    sampler: Box<dyn Sampler>,
}

impl Integrator {
    pub fn new(max_depth: i32, samples_per_pixel: u32) -> Self {
        Self {
            max_depth,
            samples_per_pixel: samples_per_pixel.max(1),
            sampler: Box::new(UniformSampler),
        }
    }

    pub fn with_sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    /// Average linear radiance through pixel `(x, y)` of a `width x height` image.
    ///
    /// Row 0 is the top of the image; the camera's `t` axis points up.
    pub fn render_pixel(
        &self,
        scene: &Scene,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut pixel_color = Color::ZERO;

        for _ in 0..self.samples_per_pixel {
            let offset = self.sampler.sample(rng);
            let s = (x as f64 + offset.x) / width as f64;
            let t = 1.0 - (y as f64 + offset.y) / height as f64;
            let ray = scene.camera().get_ray(s, t, rng);
            pixel_color += li(&ray, scene, self.max_depth, rng);
        }

        pixel_color / self.samples_per_pixel as f64
    }

    /// Renders every pixel of `tile` to row-major RGB8.
    pub fn render_tile(
        &self,
        scene: &Scene,
        tile: &FilmTile,
        width: u32,
        height: u32,
        rng: &mut dyn RngCore,
    ) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(tile.pixel_count() * CHANNELS);
        for (x, y) in tile.pixels() {
            let color = self.render_pixel(scene, x, y, width, height, rng);
            rgb.extend_from_slice(&quantize(color));
        }
        rgb
    }
}
