//! Infinite one-sided plane.

use crate::csg::{Crossing, Span};
use crate::Hit;
use glint_core::{Material, SceneError, SceneResult};
use glint_math::{Aabb, Ray, Vec3};

/// A plane through `point` facing along `normal`.
///
/// Only rays starting on the normal side see it. Planes have no bounding
/// box, so the spatial index keeps them in a separate list.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Material,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> SceneResult<Self> {
        let normal = normal
            .try_normalize()
            .ok_or(SceneError::ZeroVector("plane normal"))?;
        Ok(Self {
            point,
            normal,
            material,
        })
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// One-sided hit. `want_exit` tests the back face instead.
    ///
    /// The reported normal is always the plane's own normal.
    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        hit_plane(self.point, self.normal, ray, want_exit)
    }

    /// The half-space behind the normal, as an interval along the ray's line.
    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        let denom = self.normal.dot(ray.direction);
        let offset = self.normal.dot(ray.origin - self.point);

        let (entry, exit) = if denom == 0.0 {
            if offset > 0.0 {
                return Vec::new();
            }
            (f32::NEG_INFINITY, f32::INFINITY)
        } else {
            let t = -offset / denom;
            if denom < 0.0 {
                (t, f32::INFINITY)
            } else {
                (f32::NEG_INFINITY, t)
            }
        };

        vec![Span {
            entry: Crossing::new(entry, self.normal),
            exit: Crossing::new(exit, self.normal),
        }]
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }
}

/// Shared plane test for planes and triangles.
///
/// Flipping the test normal for exit queries keeps the one-sided rule: the
/// origin must be on the side the (possibly flipped) normal faces.
pub(crate) fn hit_plane(point: Vec3, normal: Vec3, ray: &Ray, want_exit: bool) -> Option<Hit> {
    let n = if want_exit { -normal } else { normal };
    let denom = n.dot(ray.direction);
    if denom == 0.0 {
        return None;
    }

    let numerator = n.dot(point - ray.origin);
    if numerator > 0.0 {
        return None;
    }

    let t = numerator / denom;
    if t <= 0.0 {
        return None;
    }
    Some(Hit::new(ray, t, normal))
}
