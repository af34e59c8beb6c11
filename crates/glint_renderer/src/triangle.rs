//! Triangle primitive.
//!
//! Intersection is a plane hit followed by a same-side test against the three
//! edges, so triangles share the one-sided rule of planes.

use crate::plane::hit_plane;
use crate::Hit;
use glint_core::{Material, SceneError, SceneResult};
use glint_math::{optics, Aabb, Ray, Vec2, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    vertices: [Vec3; 3],
    /// Face normal, `normalize((p1 - p0) x (p2 - p1))`
    normal: Vec3,
    /// Per-vertex texture coordinates
    uvs: Option<[Vec2; 3]>,
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, material: Material) -> SceneResult<Self> {
        let normal = (p1 - p0)
            .cross(p2 - p1)
            .try_normalize()
            .ok_or(SceneError::DegenerateTriangle)?;

        Ok(Self {
            vertices: [p0, p1, p2],
            normal,
            uvs: None,
            material,
        })
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        let hit = hit_plane(self.vertices[0], self.normal, ray, want_exit)?;
        self.contains(hit.point).then_some(hit)
    }

    /// Where the ray's line crosses the triangle, at any t.
    ///
    /// The flag is true when the ray travels against the normal (entering a
    /// closed mesh with outward-facing triangles).
    pub fn crossing(&self, ray: &Ray) -> Option<(f32, bool)> {
        let denom = self.normal.dot(ray.direction);
        if denom == 0.0 {
            return None;
        }
        let t = self.normal.dot(self.vertices[0] - ray.origin) / denom;
        self.contains(ray.at(t)).then_some((t, denom < 0.0))
    }

    fn contains(&self, point: Vec3) -> bool {
        let [a, b, c] = self.vertices;
        optics::point_in_triangle(point, a, b, c, self.normal)
    }

    /// Barycentric weights of a point in the triangle's plane, from sub-areas.
    pub fn barycentric(&self, point: Vec3) -> Vec3 {
        let [a, b, c] = self.vertices;
        let area = (b - a).cross(c - a).length();
        let wa = (b - point).cross(c - point).length() / area;
        let wb = (c - point).cross(a - point).length() / area;
        Vec3::new(wa, wb, 1.0 - wa - wb)
    }

    /// Interpolated texture coordinates at a point on the triangle.
    pub fn uv_at(&self, point: Vec3) -> Option<Vec2> {
        let [ua, ub, uc] = self.uvs?;
        let w = self.barycentric(point);
        Some(ua * w.x + ub * w.y + uc * w.z)
    }

    pub fn bounding_box(&self) -> Aabb {
        let [a, b, c] = self.vertices;
        Aabb::from_points(a.min(b).min(c), a.max(b).max(c)).pad_to_minimums()
    }

    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }
}
