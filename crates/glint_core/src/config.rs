//! Render configuration and the fixed tracing limits.

use crate::Color;
use serde::{Deserialize, Serialize};

/// Distance below which a hit is treated as the surface the ray started on.
pub const EPSILON: f32 = 1e-5;

/// Recursion bound for reflection and refraction rays combined.
pub const MAX_TRACE_DEPTH: u32 = 16;

/// Depth at which BVH construction stops splitting.
pub const MAX_BVH_DEPTH: usize = 16;

/// Internal reflections tried before a refracted ray is given up as lost.
pub const MAX_INTERNAL_REFLECTIONS: usize = 16;

/// How far away directional lights are placed for shadow rays.
pub const DIRECTIONAL_LIGHT_DISTANCE: f32 = 10_000.0;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color returned by any ray that hits nothing
    pub background: Color,
    /// Maximum recursion depth for secondary rays
    pub max_depth: u32,
    /// Average four sub-pixel rays per pixel
    pub antialias: bool,
    pub image_width: u32,
    pub image_height: u32,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::ZERO,
            max_depth: MAX_TRACE_DEPTH,
            antialias: false,
            image_width: 640,
            image_height: 480,
            field_of_view: 60.0,
        }
    }
}
