//! Tessera math types.
//!
//! Double-precision vector aliases over `glam`, plus the small set of
//! geometric value types the path tracer is built on.

pub use glam::{DMat3, DMat4, DVec2, DVec3, DVec4};

mod bounds;
mod interval;
mod ray;
mod transform;

pub use bounds::Bounds3;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Transform;

/// Direction or offset in world space.
pub type Vec3 = DVec3;
/// Position in world space.
pub type Point3 = DVec3;
/// Linear RGB radiance or reflectance.
pub type Color = DVec3;
/// Texture coordinates.
pub type Point2 = DVec2;
