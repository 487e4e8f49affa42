//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::interaction::ShapeHit;
use tessera_math::{Bounds3, Interval, Point2, Point3, Ray, Vec3};

/// Padding that keeps axis-aligned triangles from producing a flat box.
const BOUND_PADDING: f64 = 1e-4;

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    v0: Point3,
    v1: Point3,
    v2: Point3,
    /// Per-vertex texture coordinates
    uvs: [Point2; 3],
    /// Unit face normal; counter-clockwise winding faces the viewer
    normal: Vec3,
}

/// Barycentric solution of a ray-triangle hit: `(t, b1, b2)`.
struct Barycentric {
    t: f64,
    b1: f64,
    b2: f64,
}

impl Triangle {
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self::with_uvs(
            v0,
            v1,
            v2,
            [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
        )
    }

    pub fn with_uvs(v0: Point3, v1: Point3, v2: Point3, uvs: [Point2; 3]) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            uvs,
            normal,
        }
    }

    pub fn vertices(&self) -> [Point3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.solve(ray, ray_t).is_some()
    }

    pub fn intersect_p(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let Barycentric { t, b1, b2 } = self.solve(ray, ray_t)?;
        let b0 = 1.0 - b1 - b2;
        let uv = self.uvs[0] * b0 + self.uvs[1] * b1 + self.uvs[2] * b2;
        Some(ShapeHit::new(ray, t, self.normal, uv))
    }

    pub fn world_bound(&self) -> Bounds3 {
        let min = self.v0.min(self.v1).min(self.v2);
        let max = self.v0.max(self.v1).max(self.v2);
        Bounds3::expand(&Bounds3::new(min, max), BOUND_PADDING)
    }

    fn solve(&self, ray: &Ray, ray_t: Interval) -> Option<Barycentric> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to the triangle plane, or the triangle is degenerate.
        if a.abs() < 1e-12 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let b1 = f * s.dot(h);
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let q = s.cross(edge1);
        let b2 = f * ray.direction().dot(q);
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        ray_t.surrounds(t).then_some(Barycentric { t, b1, b2 })
    }
}
