//! Tessera Core - scene inputs consumed by the renderer.
//!
//! This crate provides:
//!
//! - **Textures**: the `Texture` trait with solid, checker, Perlin noise and
//!   image implementations
//! - **Meshes**: position-only triangle meshes loaded from OBJ files
//!
//! # Example
//!
//! ```ignore
//! use tessera_core::{ImageTexture, Mesh};
//!
//! let earth = ImageTexture::open_or_fallback("assets/textures/earthmap.jpg");
//! let bunny = Mesh::load_obj("assets/models/bunny.obj", true)?;
//! println!("{} triangles", bunny.triangle_count());
//! ```

pub mod mesh;
pub mod perlin;
pub mod texture;

pub use mesh::{Mesh, MeshError, MeshResult};
pub use perlin::Perlin;
pub use texture::{
    CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, TextureError, TextureResult,
};
