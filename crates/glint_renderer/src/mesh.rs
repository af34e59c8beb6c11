//! Triangle meshes.

use std::sync::Arc;

use crate::csg::{Crossing, Span};
use crate::{Hit, Triangle};
use glint_core::{Material, SceneError, SceneResult, SurfaceDetail, TextureSampler};
use glint_math::{Aabb, Ray, Vec2, Vec3};

/// An ordered collection of triangles sharing one material.
///
/// The spatial index stores every triangle on its own; the mesh is what
/// refraction asks for the far side of the solid.
#[derive(Debug, Clone)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    material: Material,
    detail: Option<SurfaceDetail>,
    bbox: Aabb,
}

impl Mesh {
    /// Build a mesh from vertex triples. Degenerate faces are skipped.
    pub fn new(faces: Vec<[Vec3; 3]>, material: Material) -> SceneResult<Self> {
        let triangles = build_triangles(faces.into_iter().map(|f| (f, None)), material);
        Self::from_triangles(triangles, material, None)
    }

    /// Build a mesh whose triangles carry texture coordinates, shaded with `texture`.
    pub fn textured(
        faces: Vec<[Vec3; 3]>,
        uvs: Vec<[Vec2; 3]>,
        texture: Arc<dyn TextureSampler>,
        material: Material,
    ) -> SceneResult<Self> {
        if faces.len() != uvs.len() {
            return Err(SceneError::UvCountMismatch {
                expected: faces.len(),
                actual: uvs.len(),
            });
        }
        let triangles = build_triangles(
            faces.into_iter().zip(uvs).map(|(f, uv)| (f, Some(uv))),
            material,
        );
        Self::from_triangles(triangles, material, Some(SurfaceDetail::Texture(texture)))
    }

    fn from_triangles(
        triangles: Vec<Triangle>,
        material: Material,
        detail: Option<SurfaceDetail>,
    ) -> SceneResult<Self> {
        let bbox = triangles
            .iter()
            .map(Triangle::bounding_box)
            .reduce(|acc, b| Aabb::surrounding(&acc, &b))
            .ok_or(SceneError::EmptyMesh)?;

        Ok(Self {
            triangles,
            material,
            detail,
            bbox,
        })
    }

    /// Replace the mesh's surface detail.
    pub fn with_detail(mut self, detail: SurfaceDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn detail(&self) -> Option<&SurfaceDetail> {
        self.detail.as_ref()
    }

    /// Closest positive hit over all triangles.
    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        self.triangles
            .iter()
            .filter_map(|tri| tri.intersect(ray, want_exit))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// Inside intervals of a closed mesh along the ray's line.
    ///
    /// Crossings are sorted along the line; an entering crossing opens an
    /// interval and the next exiting crossing closes it.
    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        let mut crossings: Vec<(f32, bool, Vec3)> = self
            .triangles
            .iter()
            .filter_map(|tri| tri.crossing(ray).map(|(t, entering)| (t, entering, tri.normal())))
            .collect();
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut spans = Vec::new();
        let mut open: Option<Crossing> = None;
        for (t, entering, normal) in crossings {
            match (entering, open) {
                (true, None) => open = Some(Crossing::new(t, normal)),
                (false, Some(entry)) => {
                    spans.push(Span {
                        entry,
                        exit: Crossing::new(t, normal),
                    });
                    open = None;
                }
                // Shared edges report the same crossing twice
                _ => {}
            }
        }
        spans
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

fn build_triangles(
    faces: impl Iterator<Item = ([Vec3; 3], Option<[Vec2; 3]>)>,
    material: Material,
) -> Vec<Triangle> {
    let mut skipped = 0usize;
    let triangles: Vec<Triangle> = faces
        .filter_map(|([a, b, c], uvs)| match Triangle::new(a, b, c, material) {
            Ok(tri) => Some(match uvs {
                Some(uvs) => tri.with_uvs(uvs),
                None => tri,
            }),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {} degenerate mesh faces", skipped);
    }
    triangles
}

/// Faces of an axis-aligned box with outward normals. Handy for tests and demos.
pub fn box_faces(min: Vec3, max: Vec3) -> Vec<[Vec3; 3]> {
    let c = |x: bool, y: bool, z: bool| {
        Vec3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    let quads = [
        // -X, +X
        [c(false, false, false), c(false, false, true), c(false, true, true), c(false, true, false)],
        [c(true, false, false), c(true, true, false), c(true, true, true), c(true, false, true)],
        // -Y, +Y
        [c(false, false, false), c(true, false, false), c(true, false, true), c(false, false, true)],
        [c(false, true, false), c(false, true, true), c(true, true, true), c(true, true, false)],
        // -Z, +Z
        [c(false, false, false), c(false, true, false), c(true, true, false), c(true, false, false)],
        [c(false, false, true), c(true, false, true), c(true, true, true), c(false, true, true)],
    ];

    quads
        .iter()
        .flat_map(|[a, b, c, d]| [[*a, *b, *c], [*a, *c, *d]])
        .collect()
}
