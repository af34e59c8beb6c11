//! Glint Renderer - Whitted ray tracing core
//!
//! Intersects rays with spheres, planes, triangles, meshes, boxes and CSG
//! solids, accelerates the nearest-hit and shadow queries with a bounding
//! volume hierarchy, and shades hits recursively with reflection,
//! refraction, and point, spot, directional and area lights.
//!
//! Scene parsing and image I/O stay outside: callers hand over constructed
//! primitives and lights and get linear colors back.

mod accel;
mod axis_box;
mod bvh;
mod camera;
pub mod csg;
mod hit;
mod light;
pub mod mesh;
mod plane;
mod primitive;
mod renderer;
mod sphere;
mod tracer;
mod triangle;

pub use accel::{Accelerator, LinearScan, SceneObjects, Shadow};
pub use axis_box::AxisBox;
pub use bvh::{Bvh, BvhNode, BvhStats};
pub use camera::Camera;
pub use csg::{CsgNode, CsgOp, CsgSolid};
pub use hit::{Hit, ObjectRef};
pub use light::{AreaLight, AreaShape, Light, Sampling, Surface};
pub use mesh::Mesh;
pub use plane::Plane;
pub use primitive::Primitive;
pub use renderer::{color_to_rgba, render, render_pixel, ImageBuffer};
pub use sphere::Sphere;
pub use tracer::Tracer;
pub use triangle::Triangle;

/// Re-export scene data and math types from the lower crates
pub use glint_core::{
    Color, HeightField, Material, RenderConfig, SceneError, SceneResult, SurfaceDetail, Texture,
    TextureSampler,
};
pub use glint_math::{Aabb, Interval, Ray, Vec2, Vec3};
