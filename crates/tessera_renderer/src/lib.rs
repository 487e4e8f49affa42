//! Tessera renderer - tile-parallel CPU path tracing
//!
//! A Monte Carlo path tracer over a BVH of spheres, moving spheres and
//! triangles. The image is split into tiles that render independently on a
//! rayon pool, each with its own seeded RNG.

pub mod bvh;
mod camera;
mod error;
mod film;
mod integrator;
mod interaction;
mod material;
mod preview;
mod primitive;
mod sampler;
mod sampling;
mod scene;
mod scheduler;
pub mod scenes;
mod settings;
mod shape;

pub use bvh::{BvhNode, BvhStats};
pub use camera::Camera;
pub use error::{RenderError, RenderResult, TileFailure};
pub use film::{partition, quantize, sort_spiral, Film, FilmTile, CHANNELS, DEFAULT_TILE_SIZE};
pub use integrator::{li, Integrator, T_MIN};
pub use interaction::{face_normal, ShapeHit, SurfaceInteraction};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterRecord};
pub use preview::PreviewBuffer;
pub use primitive::{
    Aggregate, GeometricPrimitive, MaterialId, Primitive, PrimitiveArena, PrimitiveId,
};
pub use sampler::{CenterSampler, Sampler, UniformSampler};
pub use scene::{MaterialTable, Scene, SceneBuilder};
pub use scheduler::{splitmix64, tile_seed, RenderStats, TileScheduler, TileTask};
pub use settings::RenderSettings;
pub use shape::{MovingSphere, Shape, Sphere, Triangle};

/// Re-export common math types from tessera_math
pub use tessera_math::{Bounds3, Color, Interval, Point3, Ray, Vec3};
