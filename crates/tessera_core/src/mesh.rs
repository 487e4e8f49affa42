//! Triangle mesh geometry.
//!
//! Position-only meshes loaded from OBJ files. The renderer turns each
//! triangle into its own primitive, so normals and uvs are not kept.

use std::path::Path;

use tessera_math::{Bounds3, Point3, Transform};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Mesh {0} contains no triangles")]
    Empty(String),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Vertex positions plus triangle indices (every 3 indices form a triangle).
#[derive(Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<Point3>,
    pub indices: Vec<u32>,
    pub bounds: Bounds3,
}

impl Mesh {
    pub fn new(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Load every model in an OBJ file into one mesh.
    ///
    /// Faces are triangulated on load. `flip_x` mirrors the x axis, for
    /// assets authored with the opposite handedness.
    pub fn load_obj(path: impl AsRef<Path>, flip_x: bool) -> MeshResult<Self> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let (models, _materials) =
            tobj::load_obj(path, &options).map_err(|source| MeshError::Load {
                path: path.display().to_string(),
                source,
            })?;

        let flip = if flip_x { -1.0 } else { 1.0 };
        let mut positions = Vec::new();
        let mut indices = Vec::new();

        for model in &models {
            let base = positions.len() as u32;
            positions.extend(model.mesh.positions.chunks_exact(3).map(|p| {
                Point3::new(flip * p[0] as f64, p[1] as f64, p[2] as f64)
            }));
            indices.extend(model.mesh.indices.iter().map(|i| base + i));
        }

        if indices.len() < 3 {
            return Err(MeshError::Empty(path.display().to_string()));
        }

        let mesh = Self::new(positions, indices);
        log::info!(
            "Loaded mesh {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    fn compute_bounds(positions: &[Point3]) -> Bounds3 {
        positions
            .iter()
            .fold(Bounds3::EMPTY, |b, p| Bounds3::merge_point(&b, *p))
    }

    /// Copy of the mesh with every position transformed.
    pub fn transformed(&self, transform: &Transform) -> Mesh {
        let positions = self
            .positions
            .iter()
            .map(|p| transform.apply_point(*p))
            .collect();
        Mesh::new(positions, self.indices.clone())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangle corner positions; faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |face| {
            let a = self.positions.get(face[0] as usize)?;
            let b = self.positions.get(face[1] as usize)?;
            let c = self.positions.get(face[2] as usize)?;
            Some([*a, *b, *c])
        })
    }
}
