//! Sphere whose center moves linearly over a time interval.

use super::sphere::{nearest_root, sphere_hit};
use crate::interaction::ShapeHit;
use tessera_math::{Bounds3, Interval, Point3, Ray, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct MovingSphere {
    center0: Point3,
    center1: Point3,
    time0: f64,
    time1: f64,
    radius: f64,
}

impl MovingSphere {
    /// Sphere at `center0` at `time0`, at `center1` at `time1`.
    pub fn new(center0: Point3, center1: Point3, time0: f64, time1: f64, radius: f64) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
        }
    }

    /// Center at `time`, extrapolated linearly outside `[time0, time1]`.
    pub fn center(&self, time: f64) -> Point3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> bool {
        nearest_root(self.center(ray.time()), self.radius, ray, ray_t).is_some()
    }

    pub fn intersect_p(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let center = self.center(ray.time());
        let root = nearest_root(center, self.radius, ray, ray_t)?;
        Some(sphere_hit(center, self.radius, ray, root))
    }

    /// Union of the sphere's boxes at both ends of `[time0, time1]`.
    pub fn world_bound(&self, time0: f64, time1: f64) -> Bounds3 {
        let r = Vec3::splat(self.radius);
        let c0 = self.center(time0);
        let c1 = self.center(time1);
        Bounds3::merge(&Bounds3::new(c0 - r, c0 + r), &Bounds3::new(c1 - r, c1 + r))
    }
}
