//! The closed set of scene primitives.

use crate::csg::Span;
use crate::{AxisBox, CsgSolid, Hit, Mesh, Plane, Sphere, Triangle};
use glint_core::{Material, SurfaceDetail};
use glint_math::{Aabb, Ray, Vec3};

/// Any intersectable scene object.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Mesh(Mesh),
    Box(AxisBox),
    Csg(CsgSolid),
}

impl Primitive {
    /// Nearest entry (or exit) hit in front of the ray origin.
    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray, want_exit),
            Primitive::Plane(p) => p.intersect(ray, want_exit),
            Primitive::Triangle(t) => t.intersect(ray, want_exit),
            Primitive::Mesh(m) => m.intersect(ray, want_exit),
            Primitive::Box(b) => b.intersect(ray, want_exit),
            Primitive::Csg(c) => c.intersect(ray, want_exit),
        }
    }

    /// Inside intervals along the ray's whole line. Triangles have none.
    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        match self {
            Primitive::Sphere(s) => s.spans(ray),
            Primitive::Plane(p) => p.spans(ray),
            Primitive::Triangle(_) => Vec::new(),
            Primitive::Mesh(m) => m.spans(ray),
            Primitive::Box(b) => b.spans(ray),
            Primitive::Csg(c) => c.spans(ray),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(),
            Primitive::Plane(p) => p.bounding_box(),
            Primitive::Triangle(t) => t.bounding_box(),
            Primitive::Mesh(m) => m.bounding_box(),
            Primitive::Box(b) => b.bounding_box(),
            Primitive::Csg(c) => c.bounding_box(),
        }
    }

    /// Point used to order objects during BVH construction.
    pub fn centroid(&self) -> Vec3 {
        match self {
            Primitive::Sphere(s) => s.center(),
            Primitive::Plane(p) => p.point(),
            Primitive::Triangle(t) => t.centroid(),
            _ => self.bounding_box().centroid(),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Primitive::Sphere(s) => s.material(),
            Primitive::Plane(p) => p.material(),
            Primitive::Triangle(t) => t.material(),
            Primitive::Mesh(m) => m.material(),
            Primitive::Box(b) => b.material(),
            Primitive::Csg(c) => c.material(),
        }
    }

    pub fn detail(&self) -> Option<&SurfaceDetail> {
        match self {
            Primitive::Sphere(s) => s.detail(),
            Primitive::Mesh(m) => m.detail(),
            _ => None,
        }
    }

    /// Zero-thickness surfaces that refracted rays pass straight through.
    pub fn is_thin(&self) -> bool {
        matches!(self, Primitive::Plane(_) | Primitive::Triangle(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Sphere(_) => "sphere",
            Primitive::Plane(_) => "plane",
            Primitive::Triangle(_) => "triangle",
            Primitive::Mesh(_) => "mesh",
            Primitive::Box(_) => "box",
            Primitive::Csg(_) => "csg solid",
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Plane> for Primitive {
    fn from(p: Plane) -> Self {
        Primitive::Plane(p)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Mesh> for Primitive {
    fn from(m: Mesh) -> Self {
        Primitive::Mesh(m)
    }
}

impl From<AxisBox> for Primitive {
    fn from(b: AxisBox) -> Self {
        Primitive::Box(b)
    }
}

impl From<CsgSolid> for Primitive {
    fn from(c: CsgSolid) -> Self {
        Primitive::Csg(c)
    }
}
