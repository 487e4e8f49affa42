//! Records produced by ray-geometry intersection.

use crate::primitive::{MaterialId, PrimitiveId};
use tessera_math::{Point2, Point3, Ray, Vec3};

/// Geometric part of a hit, produced by a shape before any material is known.
#[derive(Debug, Clone, Copy)]
pub struct ShapeHit {
    pub point: Point3,
    /// Unit normal, always opposing the incoming ray.
    pub normal: Vec3,
    pub uv: Point2,
    /// Ray parameter of the hit.
    pub time: f64,
    /// Whether the ray arrived on the side the outward normal points to.
    pub front_face: bool,
}

impl ShapeHit {
    pub fn new(ray: &Ray, time: f64, outward_normal: Vec3, uv: Point2) -> Self {
        let (normal, front_face) = face_normal(ray, outward_normal);
        Self {
            point: ray.at(time),
            normal,
            uv,
            time,
            front_face,
        }
    }
}

/// Orients `outward_normal` against the ray; returns `(normal, front_face)`.
#[inline]
pub fn face_normal(ray: &Ray, outward_normal: Vec3) -> (Vec3, bool) {
    let front_face = ray.direction().dot(outward_normal) < 0.0;
    let normal = if front_face {
        outward_normal
    } else {
        -outward_normal
    };
    (normal, front_face)
}

/// A complete nearest-hit record.
///
/// Only ever built by a geometric primitive after its shape reports a hit,
/// so every field is populated.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInteraction {
    pub point: Point3,
    pub normal: Vec3,
    pub uv: Point2,
    /// Ray parameter of the hit; callers shrink `t_max` to it for sibling queries.
    pub time: f64,
    pub front_face: bool,
    pub primitive: PrimitiveId,
    pub material: MaterialId,
}

impl SurfaceInteraction {
    pub fn from_shape_hit(hit: ShapeHit, primitive: PrimitiveId, material: MaterialId) -> Self {
        Self {
            point: hit.point,
            normal: hit.normal,
            uv: hit.uv,
            time: hit.time,
            front_face: hit.front_face,
            primitive,
            material,
        }
    }

    /// Re-orients the stored normal against `ray`.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        (self.normal, self.front_face) = face_normal(ray, outward_normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_front() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let (n, front) = face_normal(&ray, Vec3::Z);
        assert!(front);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_face_normal_back() {
        let ray = Ray::new(Point3::ZERO, Vec3::Z, 0.0);
        let (n, front) = face_normal(&ray, Vec3::Z);
        assert!(!front);
        assert_eq!(n, -Vec3::Z);
    }

    #[test]
    fn test_shape_hit_point_on_ray() {
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -2.0), 0.0);
        let hit = ShapeHit::new(&ray, 0.5, Vec3::Z, Point2::new(0.25, 0.75));
        assert_eq!(hit.point, Point3::new(0.0, 0.0, -0.5));
        assert!(hit.front_face);
        assert_eq!(hit.time, 0.5);
    }

    #[test]
    fn test_set_face_normal_opposes_ray() {
        let ray = Ray::new(Point3::ZERO, Vec3::X, 0.0);
        let hit = ShapeHit::new(&ray, 1.0, -Vec3::X, Point2::ZERO);
        let mut isect = SurfaceInteraction::from_shape_hit(hit, PrimitiveId(0), MaterialId(0));
        isect.set_face_normal(&ray, Vec3::X);
        assert!(!isect.front_face);
        assert!(isect.normal.dot(ray.direction()) < 0.0);
    }
}
