//! Renderer error types.

use crate::film::FilmTile;
use crate::primitive::{MaterialId, PrimitiveId};
use thiserror::Error;

/// A tile whose task panicked instead of finishing.
#[derive(Debug, Clone)]
pub struct TileFailure {
    pub index: usize,
    pub tile: FilmTile,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unsupported operation: {operation} on {primitive}")]
    UnsupportedOperation {
        operation: &'static str,
        primitive: &'static str,
    },

    #[error("Scene contains no primitives")]
    EmptyScene,

    #[error("Aggregate must contain at least one primitive")]
    EmptyAggregate,

    #[error("No primitive with id {0:?}")]
    InvalidPrimitive(PrimitiveId),

    #[error("No material with id {0:?}")]
    InvalidMaterial(MaterialId),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{} tile(s) failed to render", .0.len())]
    TileFailures(Vec<TileFailure>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
