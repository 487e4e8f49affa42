//! Camera for ray generation.

use crate::sampling::{random_in_unit_disk, random_range};
use rand::RngCore;
use tessera_math::{Point3, Ray, Vec3};

/// Thin-lens perspective camera with a shutter interval.
///
/// Rays are addressed by normalized image coordinates `(s, t)` in `[0, 1]`,
/// with `(0, 0)` at the lower-left corner of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    vfov: f64,         // Vertical field of view in degrees
    aspect_ratio: f64, // Width over height
    aperture: f64,     // Lens diameter; 0 is a pinhole
    focus_dist: f64,   // Distance from camera to plane of perfect focus
    time0: f64,
    time1: f64,

    // Cached values, refreshed whenever a setting changes
    lower_left: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            lower_left: Point3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.initialize();
        camera
    }

    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self.initialize();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.initialize();
        self
    }

    /// Shutter open and close times; each ray gets a uniform time in between.
    pub fn with_shutter(mut self, time0: f64, time1: f64) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn shutter(&self) -> (f64, f64) {
        (self.time0, self.time1)
    }

    fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        self.w = (self.look_from - self.look_at).normalize_or_zero();
        self.u = self.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);

        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left = self.look_from
            - self.horizontal / 2.0
            - self.vertical / 2.0
            - self.focus_dist * self.w;
    }

    /// Ray through normalized image point `(s, t)`.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.aperture <= 0.0 {
            self.look_from
        } else {
            let rd = (self.aperture / 2.0) * random_in_unit_disk(rng);
            self.look_from + self.u * rd.x + self.v * rd.y
        };

        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        let time = if self.time1 > self.time0 {
            random_range(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(origin, target - origin, time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
