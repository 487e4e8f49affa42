// Affine transforms over glam::DMat4
//
// Keeps the inverse alongside the matrix so normals and inverse mappings
// never re-invert on the render path.

use crate::{Bounds3, Point3, Vec3};
use glam::{DMat3, DMat4};
use std::ops::Mul;

/// Determinants below this magnitude are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    m: DMat4,
    m_inv: DMat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m: DMat4::IDENTITY,
        m_inv: DMat4::IDENTITY,
    };

    /// Wraps a matrix and computes its inverse.
    ///
    /// A singular matrix is accepted with a warning; its inverse falls back
    /// to the identity so callers can keep going.
    pub fn new(m: DMat4) -> Self {
        let det = m.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            log::warn!(
                "Singular transform matrix (determinant {}), using identity as inverse",
                det
            );
            return Self {
                m,
                m_inv: DMat4::IDENTITY,
            };
        }
        Self {
            m,
            m_inv: m.inverse(),
        }
    }

    pub fn translate(delta: Vec3) -> Self {
        Self {
            m: DMat4::from_translation(delta),
            m_inv: DMat4::from_translation(-delta),
        }
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::new(DMat4::from_scale(Vec3::new(x, y, z)))
    }

    /// Rotation about +Y by `degrees`.
    pub fn rotate_y(degrees: f64) -> Self {
        let m = DMat4::from_rotation_y(degrees.to_radians());
        Self {
            m,
            m_inv: m.transpose(),
        }
    }

    pub fn matrix(&self) -> DMat4 {
        self.m
    }

    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    #[inline]
    pub fn apply_point(&self, p: Point3) -> Point3 {
        self.m.transform_point3(p)
    }

    /// Applies rotation and scale only (w = 0).
    #[inline]
    pub fn apply_vector(&self, v: Vec3) -> Vec3 {
        self.m.transform_vector3(v)
    }

    /// Normals transform by the inverse transpose.
    #[inline]
    pub fn apply_normal(&self, n: Vec3) -> Vec3 {
        self.m_inv.transpose().transform_vector3(n)
    }

    /// Box around all eight transformed corners.
    pub fn apply_bounds(&self, b: &Bounds3) -> Bounds3 {
        if b.is_empty() {
            return *b;
        }
        (0..8).fold(Bounds3::EMPTY, |acc, i| {
            Bounds3::merge_point(&acc, self.apply_point(b.corner(i)))
        })
    }

    /// True when the linear part flips orientation (negative determinant).
    pub fn swaps_handedness(&self) -> bool {
        DMat3::from_mat4(self.m).determinant() < 0.0
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: self.m * rhs.m,
            m_inv: rhs.m_inv * self.m_inv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_point_and_vector() {
        let t = Transform::translate(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(t.apply_point(Point3::new(1.0, 2.0, 3.0)), Point3::new(11.0, 22.0, 33.0));
        // Translation should not affect vectors.
        assert_eq!(t.apply_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform::translate(Vec3::new(1.0, -2.0, 3.0))
            * Transform::rotate_y(45.0)
            * Transform::scale(2.0, 3.0, 4.0);
        let p = Point3::new(5.0, 3.0, 2.0);
        let back = t.inverse().apply_point(t.apply_point(p));
        assert!((back - p).length() < 1e-9);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let t = Transform::rotate_y(90.0);
        let v = t.apply_vector(Vec3::X);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_apply_bounds() {
        let t = Transform::translate(Vec3::splat(5.0));
        let b = t.apply_bounds(&Bounds3::new(Point3::ZERO, Point3::ONE));
        assert!((b.p_min - Point3::splat(5.0)).length() < 1e-12);
        assert!((b.p_max - Point3::splat(6.0)).length() < 1e-12);
        assert!(t.apply_bounds(&Bounds3::EMPTY).is_empty());
    }

    #[test]
    fn test_singular_matrix_does_not_panic() {
        let t = Transform::scale(1.0, 0.0, 1.0);
        assert_eq!(t.inverse().matrix(), DMat4::IDENTITY);
        let p = t.apply_point(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_swaps_handedness() {
        assert!(Transform::scale(-1.0, 1.0, 1.0).swaps_handedness());
        assert!(!Transform::scale(1.0, 2.0, 3.0).swaps_handedness());
    }

    #[test]
    fn test_normal_stays_perpendicular_under_scale() {
        let t = Transform::scale(2.0, 1.0, 1.0);
        // Plane x + y = 0 has normal (1, 1, 0) and contains tangent (1, -1, 0).
        let n = t.apply_normal(Vec3::new(1.0, 1.0, 0.0));
        let tangent = t.apply_vector(Vec3::new(1.0, -1.0, 0.0));
        assert!(n.dot(tangent).abs() < 1e-12);
    }
}
