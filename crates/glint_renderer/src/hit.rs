//! Intersection results and object handles.

use glint_math::{Ray, Vec3};

/// Record of a ray-surface intersection.
///
/// Hits are plain values returned from `intersect`; nothing is cached on the
/// primitive, so the same scene can be traced from many threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs (in units of the ray direction)
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Outward surface normal at the intersection (unit length)
    pub normal: Vec3,
}

impl Hit {
    /// Build a hit at parameter `t` along `ray`.
    #[inline]
    pub fn new(ray: &Ray, t: f32, normal: Vec3) -> Self {
        Self {
            t,
            point: ray.at(t),
            normal,
        }
    }
}

/// Handle to one intersectable object of a scene.
///
/// Meshes are never indexed as a whole: each of their triangles is its own
/// object, while still knowing which mesh it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    /// A primitive by its index in the scene list.
    Primitive(usize),
    /// One triangle of the mesh at scene index `mesh`.
    MeshTriangle { mesh: usize, triangle: usize },
}

impl ObjectRef {
    /// Scene index of the primitive that owns this object.
    pub fn primitive_index(&self) -> usize {
        match *self {
            ObjectRef::Primitive(index) => index,
            ObjectRef::MeshTriangle { mesh, .. } => mesh,
        }
    }
}
