//! Scene construction errors.
//!
//! Everything here is raised while the scene is being assembled. Tracing
//! itself never fails: a ray either hits something or it does not.

use thiserror::Error;

/// Errors that can occur while building primitives, lights and CSG trees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("{0} cannot be used as a CSG operand: it has no interior")]
    UnsupportedCsgLeaf(&'static str),

    #[error("Triangle has collinear vertices")]
    DegenerateTriangle,

    #[error("Mesh has no usable triangles")]
    EmptyMesh,

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidSphereRadius(f32),

    #[error("{0} must be a non-zero vector")]
    ZeroVector(&'static str),

    #[error("Box minimum corner must be below its maximum on every axis")]
    InvalidBox,

    #[error("Area light needs at least one sample")]
    ZeroLightSamples,

    #[error("Area light {0} must be positive")]
    InvalidLightExtent(&'static str),

    #[error("Expected {expected} UV triples, got {actual}")]
    UvCountMismatch { expected: usize, actual: usize },

    #[error("Texture of {width}x{height} cannot hold {len} texels")]
    InvalidTexture { width: u32, height: u32, len: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;
