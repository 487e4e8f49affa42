//! Material trait for surface scattering.

use std::sync::Arc;

use crate::interaction::SurfaceInteraction;
use crate::sampling::{random_f64, random_unit_vector};
use rand::RngCore;
use tessera_core::{SolidColor, Texture};
use tessera_math::{Color, Point3, Ray, Vec3};

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    /// Per-channel throughput applied to the scattered ray's radiance
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the path ends here (absorbed, or a light source).
    fn scatter(
        &self,
        ray_in: &Ray,
        isect: &SurfaceInteraction,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Light emitted at the given surface coordinates. Black unless overridden.
    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(albedo)))
    }

    pub fn textured(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        isect: &SurfaceInteraction,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let mut scatter_direction = isect.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-12 {
            scatter_direction = isect.normal;
        }

        Some(ScatterRecord {
            attenuation: self.albedo.value(isect.uv.x, isect.uv.y, isect.point),
            scattered: Ray::new(isect.point, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// `fuzz` is the roughness: 0 is a perfect mirror, 1 very rough.
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        isect: &SurfaceInteraction,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction(), isect.normal);
        let direction = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzzed reflections below the surface are absorbed.
        (direction.dot(isect.normal) > 0.0).then(|| ScatterRecord {
            attenuation: self.albedo,
            scattered: Ray::new(isect.point, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// `ior`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ratio: f64) -> f64 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        isect: &SurfaceInteraction,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let ratio = if isect.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction();
        let cos_theta = (-unit_direction).dot(isect.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, ratio) > random_f64(rng) {
                reflect(unit_direction, isect.normal)
            } else {
                refract(unit_direction, isect.normal, ratio)
            };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            scattered: Ray::new(isect.point, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter. Never scatters.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(emit)))
    }

    pub fn textured(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _isect: &SurfaceInteraction,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, u: f64, v: f64, p: Point3) -> Color {
        self.emit.value(u, v, p)
    }
}

#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of unit vector `uv` through a surface with normal `n`.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
