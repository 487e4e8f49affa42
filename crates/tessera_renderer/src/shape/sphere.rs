//! Sphere primitive for ray tracing.

use crate::interaction::ShapeHit;
use std::f64::consts::PI;
use tessera_math::{Bounds3, Interval, Point2, Point3, Ray, Vec3};

/// A static sphere.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> bool {
        nearest_root(self.center, self.radius, ray, ray_t).is_some()
    }

    pub fn intersect_p(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let root = nearest_root(self.center, self.radius, ray, ray_t)?;
        Some(sphere_hit(self.center, self.radius, ray, root))
    }

    pub fn world_bound(&self) -> Bounds3 {
        let r = Vec3::splat(self.radius);
        Bounds3::new(self.center - r, self.center + r)
    }
}

/// Smallest root of the ray-sphere quadratic strictly inside `ray_t`.
#[inline]
pub(crate) fn nearest_root(center: Point3, radius: f64, ray: &Ray, ray_t: Interval) -> Option<f64> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let root = (h - sqrtd) / a;
    if ray_t.surrounds(root) {
        return Some(root);
    }
    let root = (h + sqrtd) / a;
    ray_t.surrounds(root).then_some(root)
}

pub(crate) fn sphere_hit(center: Point3, radius: f64, ray: &Ray, root: f64) -> ShapeHit {
    let outward_normal = (ray.at(root) - center) / radius;
    ShapeHit::new(ray, root, outward_normal, sphere_uv(outward_normal))
}

/// UV coordinates for a point on the unit sphere.
///
/// `u` is the angle around Y from -X, `v` the angle from -Y, both in `[0, 1]`.
pub(crate) fn sphere_uv(p: Vec3) -> Point2 {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    Point2::new(phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hit = sphere
            .intersect_p(&ray, Interval::new(0.001, f64::INFINITY))
            .unwrap();

        assert!((hit.time - 0.5).abs() < 1e-9);
        assert!(hit.front_face);
        assert!((hit.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Point3::ZERO, Vec3::Y, 0.0);
        let interval = Interval::new(0.001, f64::INFINITY);
        assert!(sphere.intersect_p(&ray, interval).is_none());
        assert!(!sphere.intersect(&ray, interval));
    }

    #[test]
    fn test_intersect_respects_range() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -10.0), 1.0);
        let ray = Ray::new(Point3::ZERO, -Vec3::Z, 0.0);
        assert!(!sphere.intersect(&ray, Interval::new(0.001, 5.0)));
        assert!(sphere.intersect(&ray, Interval::new(0.001, 50.0)));
    }

    #[test]
    fn test_hit_from_inside_is_back_face() {
        let sphere = Sphere::new(Point3::ZERO, 2.0);
        let ray = Ray::new(Point3::ZERO, Vec3::X, 0.0);
        let hit = sphere
            .intersect_p(&ray, Interval::new(0.001, f64::INFINITY))
            .unwrap();

        assert!((hit.time - 2.0).abs() < 1e-9);
        assert!(!hit.front_face);
        assert!((hit.normal + Vec3::X).length() < 1e-9);
    }

    #[test]
    fn test_sphere_uv_poles() {
        let bottom = sphere_uv(-Vec3::Y);
        assert!(bottom.y.abs() < 1e-12);
        let top = sphere_uv(Vec3::Y);
        assert!((top.y - 1.0).abs() < 1e-12);
        let uv = sphere_uv(Vec3::X);
        assert!((uv.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_world_bound() {
        let b = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5).world_bound();
        assert_eq!(b.p_min, Point3::new(0.5, 1.5, 2.5));
        assert_eq!(b.p_max, Point3::new(1.5, 2.5, 3.5));
    }
}
