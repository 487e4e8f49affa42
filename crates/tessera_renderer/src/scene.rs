//! Scene container and builder.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::bvh;
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::interaction::SurfaceInteraction;
use crate::material::Material;
use crate::primitive::{Aggregate, MaterialId, PrimitiveArena, PrimitiveId};
use crate::shape::{Shape, Triangle};
use rand::RngCore;
use tessera_core::Mesh;
use tessera_math::{Bounds3, Color, Interval, Ray, Transform};

/// Materials indexed by [`MaterialId`].
#[derive(Clone, Default)]
pub struct MaterialTable {
    materials: Vec<Arc<dyn Material>>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: impl Material + 'static) -> MaterialId {
        self.add_shared(Arc::new(material))
    }

    pub fn add_shared(&mut self, material: Arc<dyn Material>) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&dyn Material> {
        self.materials.get(id.0).map(|m| m.as_ref())
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        id.0 < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Everything a render reads: geometry, materials, camera and background.
///
/// Immutable once built and shared by reference across tile tasks.
pub struct Scene {
    arena: PrimitiveArena,
    root: PrimitiveId,
    materials: MaterialTable,
    camera: Camera,
    background: Color,
}

impl Scene {
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Radiance returned by rays that hit nothing.
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn arena(&self) -> &PrimitiveArena {
        &self.arena
    }

    pub fn root(&self) -> PrimitiveId {
        self.root
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn world_bound(&self) -> Bounds3 {
        self.arena.world_bound(self.root)
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.arena.intersect(self.root, ray, ray_t)
    }

    pub fn intersect_p(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceInteraction> {
        self.arena.intersect_p(self.root, ray, ray_t)
    }

    pub fn material(&self, id: MaterialId) -> RenderResult<&dyn Material> {
        self.materials.get(id).ok_or(RenderError::InvalidMaterial(id))
    }
}

/// Collects materials and primitives, then wraps them in a BVH.
///
/// Primitives added with the `add_*` methods become direct children of the
/// BVH. [`SceneBuilder::create_shape`] stores a shape without adding it, for
/// grouping into a nested aggregate with [`SceneBuilder::add_aggregate`].
#[derive(Default)]
pub struct SceneBuilder {
    arena: PrimitiveArena,
    materials: MaterialTable,
    top_level: Vec<PrimitiveId>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: impl Material + 'static) -> MaterialId {
        self.materials.add(material)
    }

    pub fn add_shared_material(&mut self, material: Arc<dyn Material>) -> MaterialId {
        self.materials.add_shared(material)
    }

    /// Number of primitives that will become BVH leaves.
    pub fn primitive_count(&self) -> usize {
        self.top_level.len()
    }

    /// Stores a shape without adding it to the scene's top level.
    pub fn create_shape(
        &mut self,
        shape: impl Into<Shape>,
        material: MaterialId,
    ) -> RenderResult<PrimitiveId> {
        if !self.materials.contains(material) {
            return Err(RenderError::InvalidMaterial(material));
        }
        Ok(self.arena.add_shape(shape, material))
    }

    pub fn add_shape(
        &mut self,
        shape: impl Into<Shape>,
        material: MaterialId,
    ) -> RenderResult<PrimitiveId> {
        let id = self.create_shape(shape, material)?;
        self.top_level.push(id);
        Ok(id)
    }

    /// Groups existing primitives into an aggregate and adds it to the scene.
    pub fn add_aggregate(&mut self, children: &[PrimitiveId]) -> RenderResult<PrimitiveId> {
        if children.is_empty() {
            return Err(RenderError::EmptyAggregate);
        }
        let aggregate = self.arena.push(Aggregate::new());
        self.arena.add_primitives(aggregate, children)?;
        self.top_level.push(aggregate);
        Ok(aggregate)
    }

    /// Adds one triangle primitive per mesh face; returns how many.
    pub fn add_mesh(&mut self, mesh: &Mesh, material: MaterialId) -> RenderResult<usize> {
        let mut count = 0;
        for [a, b, c] in mesh.triangles() {
            self.add_shape(Triangle::new(a, b, c), material)?;
            count += 1;
        }
        Ok(count)
    }

    /// Loads an OBJ file, transforms it and adds its triangles.
    ///
    /// A file that cannot be loaded is logged and skipped; the return value
    /// is the number of triangles added.
    pub fn load_mesh(
        &mut self,
        path: impl AsRef<Path>,
        transform: &Transform,
        flip_x: bool,
        material: MaterialId,
    ) -> RenderResult<usize> {
        let path = path.as_ref();
        match Mesh::load_obj(path, flip_x) {
            Ok(mesh) => self.add_mesh(&mesh.transformed(transform), material),
            Err(e) => {
                log::error!("Skipping mesh {}: {}", path.display(), e);
                Ok(0)
            }
        }
    }

    /// Builds the BVH over everything added so far.
    pub fn build(
        mut self,
        camera: Camera,
        background: Color,
        rng: &mut dyn RngCore,
    ) -> RenderResult<Scene> {
        if self.top_level.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        log::info!("Building BVH over {} primitives", self.top_level.len());
        let start = Instant::now();
        let root = bvh::build(&mut self.arena, &self.top_level, rng)?;
        let stats = bvh::stats(&self.arena, root);
        log::info!(
            "Building BVH finished in {:.2?}: {} nodes, depth {}",
            start.elapsed(),
            stats.nodes,
            stats.depth
        );

        Ok(Scene {
            arena: self.arena,
            root,
            materials: self.materials,
            camera,
            background,
        })
    }
}
