//! Glint Core - scene data shared by the ray tracer.
//!
//! This crate provides:
//!
//! - **Materials**: Whitted-style surface coefficients (`Material`, `Color`)
//! - **Configuration**: `RenderConfig` and the fixed tracing constants
//! - **Errors**: `SceneError` for malformed scene construction
//! - **Surface detail**: texture and height-field samplers plugged into shading

pub mod config;
pub mod error;
pub mod material;
pub mod texture;

// Re-export commonly used types
pub use config::{
    RenderConfig, DIRECTIONAL_LIGHT_DISTANCE, EPSILON, MAX_BVH_DEPTH, MAX_INTERNAL_REFLECTIONS,
    MAX_TRACE_DEPTH,
};
pub use error::{SceneError, SceneResult};
pub use material::{Color, Material};
pub use texture::{HeightField, SurfaceDetail, Texture, TextureSampler};
