//! Per-pixel sample offsets.

use crate::sampling::random_f64;
use rand::RngCore;
use tessera_math::Point2;

/// Produces sub-pixel offsets in `[0, 1)²`.
pub trait Sampler: Send + Sync {
    fn sample(&self, rng: &mut dyn RngCore) -> Point2;
}

/// Independent uniform jitter; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSampler;

impl Sampler for UniformSampler {
    fn sample(&self, rng: &mut dyn RngCore) -> Point2 {
        Point2::new(random_f64(rng), random_f64(rng))
    }
}

/// Always the pixel center. Consumes no randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterSampler;

impl Sampler for CenterSampler {
    fn sample(&self, _rng: &mut dyn RngCore) -> Point2 {
        Point2::new(0.5, 0.5)
    }
}
