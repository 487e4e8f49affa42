//! Random sampling helpers. All randomness flows through an explicit RNG.

use rand::{Rng, RngCore};
use tessera_math::{Point2, Vec3};

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn random_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform sample in `[min, max)`.
#[inline]
pub fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * random_f64(rng)
}

/// Vector with each component uniform in `[min, max)`.
pub fn random_vec3(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}

/// Uniformly distributed direction on the unit sphere (rejection sampling).
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = random_vec3(rng, -1.0, 1.0);
        let len_sq = v.length_squared();
        if len_sq > 1e-12 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Uniform point inside the unit disk.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Point2 {
    loop {
        let p = Point2::new(random_range(rng, -1.0, 1.0), random_range(rng, -1.0, 1.0));
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
