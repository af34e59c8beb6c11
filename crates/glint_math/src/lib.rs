// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod interval;
pub mod optics;
mod ray;

pub use aabb::{Aabb, SlabSpan};
pub use interval::Interval;
pub use ray::Ray;
