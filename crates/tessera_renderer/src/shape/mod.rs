//! Pure geometry, no material.
//!
//! `Shape` is a closed set; every variant answers the same three questions:
//! does the ray hit me within a range, where is the nearest hit, and what box
//! bounds me over a time interval.

mod moving_sphere;
mod sphere;
mod triangle;

pub use moving_sphere::MovingSphere;
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::interaction::ShapeHit;
use tessera_math::{Bounds3, Interval, Ray};

#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Triangle(Triangle),
}

impl Shape {
    /// Existence test within the open range `ray_t`.
    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            Shape::Sphere(s) => s.intersect(ray, ray_t),
            Shape::MovingSphere(s) => s.intersect(ray, ray_t),
            Shape::Triangle(t) => t.intersect(ray, ray_t),
        }
    }

    /// Nearest hit within the open range `ray_t`.
    #[inline]
    pub fn intersect_p(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        match self {
            Shape::Sphere(s) => s.intersect_p(ray, ray_t),
            Shape::MovingSphere(s) => s.intersect_p(ray, ray_t),
            Shape::Triangle(t) => t.intersect_p(ray, ray_t),
        }
    }

    /// Box containing the shape at every time in `[time0, time1]`.
    pub fn world_bound(&self, time0: f64, time1: f64) -> Bounds3 {
        match self {
            Shape::Sphere(s) => s.world_bound(),
            Shape::MovingSphere(s) => s.world_bound(time0, time1),
            Shape::Triangle(t) => t.world_bound(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<MovingSphere> for Shape {
    fn from(s: MovingSphere) -> Self {
        Shape::MovingSphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}
