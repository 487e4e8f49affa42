use crate::{Point3, Vec3};

/// A ray in 3D space with origin, unit direction, and time.
///
/// The direction is normalized at construction and its component-wise
/// reciprocal is cached for the slab test in [`crate::Bounds3::hit`]. A zero
/// direction component yields an infinite reciprocal, which the slab test
/// relies on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vec3,
    inv_direction: Vec3,
    time: f64,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3, time: f64) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
            time,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Unit-length direction.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Component-wise `1 / direction`.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Time value for motion blur.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Point3::ZERO, Vec3::new(3.0, 0.0, 4.0), 0.0);
        assert!((ray.direction().length() - 1.0).abs() < 1e-12);
        assert_eq!(ray.direction(), Vec3::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.0);
        assert_eq!(ray.at(0.0), Point3::ZERO);
        assert_eq!(ray.at(2.5), Point3::new(2.5, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Point3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_inverse_direction_of_axis_ray() {
        let ray = Ray::new(Point3::ZERO, Vec3::Z, 0.5);
        let inv = ray.inv_direction();
        assert_eq!(inv.x, f64::INFINITY);
        assert_eq!(inv.y, f64::INFINITY);
        assert_eq!(inv.z, 1.0);
        assert_eq!(ray.time(), 0.5);
    }
}
