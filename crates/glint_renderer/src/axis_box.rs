//! Axis-aligned box primitive, intersected with the same slab test the BVH uses.

use crate::csg::{Crossing, Span};
use crate::Hit;
use glint_core::{Material, SceneError, SceneResult};
use glint_math::{Aabb, Ray, Vec3};

#[derive(Debug, Clone)]
pub struct AxisBox {
    bounds: Aabb,
    material: Material,
}

impl AxisBox {
    pub fn new(min: Vec3, max: Vec3, material: Material) -> SceneResult<Self> {
        if !(min.x < max.x && min.y < max.y && min.z < max.z) {
            return Err(SceneError::InvalidBox);
        }
        Ok(Self {
            bounds: Aabb::from_points(min, max),
            material,
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        let span = self.bounds.slab(ray)?;
        let (t, normal) = if want_exit {
            (span.far, face_normal(span.far_axis, ray.direction, 1.0))
        } else {
            (span.near, face_normal(span.near_axis, ray.direction, -1.0))
        };
        if t <= 0.0 || !t.is_finite() {
            return None;
        }
        Some(Hit::new(ray, t, normal))
    }

    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        match self.bounds.slab(ray) {
            Some(span) => vec![Span {
                entry: Crossing::new(span.near, face_normal(span.near_axis, ray.direction, -1.0)),
                exit: Crossing::new(span.far, face_normal(span.far_axis, ray.direction, 1.0)),
            }],
            None => Vec::new(),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bounds
    }
}

/// Outward normal of the face on `axis` that a ray with `direction` crosses.
///
/// Entry faces oppose the direction (`sign = -1`), exit faces follow it.
fn face_normal(axis: usize, direction: Vec3, sign: f32) -> Vec3 {
    let mut normal = Vec3::ZERO;
    normal[axis] = sign * direction[axis].signum();
    normal
}
