//! Scene query interface shared by the BVH and the brute-force scan.
//!
//! Both index the same flattened object list: planes apart (they are
//! unbounded), every mesh triangle as its own object, everything else as is.

use crate::{Hit, ObjectRef, Primitive};
use glint_core::{Color, Material, EPSILON};
use glint_math::{Interval, Ray, Vec3};

/// Outcome of a shadow query between a surface point and a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shadow {
    /// An opaque object blocks the segment.
    Occluded,
    /// Light gets through, filtered by the product of blocker transmittances.
    Lit(Color),
}

/// Nearest-hit and occlusion queries over a fixed set of primitives.
pub trait Accelerator: Send + Sync {
    /// The scene list that `ObjectRef`s index into.
    fn objects(&self) -> &SceneObjects;

    /// Closest object hit in front of the ray origin, ignoring hits within
    /// `EPSILON` of it.
    fn nearest(&self, ray: &Ray) -> Option<(ObjectRef, Hit)>;

    /// Occlusion of the segment `from -> to`.
    ///
    /// Stops at the first opaque blocker; transmissive blockers multiply
    /// their transmittance into the light that gets through.
    fn shadow(&self, from: Vec3, to: Vec3) -> Shadow;

    fn primitives(&self) -> &[Primitive] {
        &self.objects().primitives
    }
}

/// Primitives plus the flattened object lists the accelerators walk.
#[derive(Debug, Clone)]
pub struct SceneObjects {
    primitives: Vec<Primitive>,
    planes: Vec<ObjectRef>,
    bounded: Vec<ObjectRef>,
}

impl SceneObjects {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        let mut planes = Vec::new();
        let mut bounded = Vec::new();

        for (index, primitive) in primitives.iter().enumerate() {
            match primitive {
                Primitive::Plane(_) => planes.push(ObjectRef::Primitive(index)),
                Primitive::Mesh(mesh) => bounded.extend(
                    (0..mesh.triangles().len())
                        .map(|triangle| ObjectRef::MeshTriangle { mesh: index, triangle }),
                ),
                _ => bounded.push(ObjectRef::Primitive(index)),
            }
        }

        Self {
            primitives,
            planes,
            bounded,
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Unbounded objects, tested linearly by every query.
    pub fn planes(&self) -> &[ObjectRef] {
        &self.planes
    }

    /// Objects with a finite box, in scene order.
    pub fn bounded(&self) -> &[ObjectRef] {
        &self.bounded
    }

    /// The primitive an object belongs to (the mesh, for mesh triangles).
    pub fn owner(&self, object: ObjectRef) -> Option<&Primitive> {
        self.primitives.get(object.primitive_index())
    }

    pub fn material(&self, object: ObjectRef) -> Option<&Material> {
        self.owner(object).map(Primitive::material)
    }

    /// Intersect one object. Mesh triangles are tested alone.
    pub fn intersect(&self, object: ObjectRef, ray: &Ray, want_exit: bool) -> Option<Hit> {
        match object {
            ObjectRef::Primitive(index) => self.primitives.get(index)?.intersect(ray, want_exit),
            ObjectRef::MeshTriangle { mesh, triangle } => match self.primitives.get(mesh)? {
                Primitive::Mesh(m) => m.triangles().get(triangle)?.intersect(ray, want_exit),
                _ => None,
            },
        }
    }

    /// Intersect the whole solid an object belongs to.
    pub fn intersect_owner(&self, object: ObjectRef, ray: &Ray, want_exit: bool) -> Option<Hit> {
        self.owner(object)?.intersect(ray, want_exit)
    }

    pub fn bounding_box(&self, object: ObjectRef) -> Option<glint_math::Aabb> {
        match object {
            ObjectRef::Primitive(index) => Some(self.primitives.get(index)?.bounding_box()),
            ObjectRef::MeshTriangle { mesh, triangle } => match self.primitives.get(mesh)? {
                Primitive::Mesh(m) => Some(m.triangles().get(triangle)?.bounding_box()),
                _ => None,
            },
        }
    }

    pub fn centroid(&self, object: ObjectRef) -> Option<Vec3> {
        match object {
            ObjectRef::Primitive(index) => Some(self.primitives.get(index)?.centroid()),
            ObjectRef::MeshTriangle { mesh, triangle } => match self.primitives.get(mesh)? {
                Primitive::Mesh(m) => Some(m.triangles().get(triangle)?.centroid()),
                _ => None,
            },
        }
    }

    /// Keep `object` in `best` if it is hit closer than the current best.
    pub(crate) fn consider(
        &self,
        object: ObjectRef,
        ray: &Ray,
        best: &mut Option<(ObjectRef, Hit)>,
    ) {
        if let Some(hit) = self.intersect(object, ray, false) {
            let closest = best.map_or(f32::INFINITY, |(_, b)| b.t);
            if hit.t > EPSILON && hit.t < closest {
                *best = Some((object, hit));
            }
        }
    }

    /// Apply `object` to a running shadow query. Returns true once occluded.
    pub(crate) fn block(&self, object: ObjectRef, segment: &Segment, light: &mut Color) -> bool {
        let Some(hit) = self.intersect(object, &segment.ray, false) else {
            return false;
        };
        if !segment.range.surrounds(hit.t) {
            return false;
        }
        match self.material(object) {
            Some(material) if material.is_transmissive() => {
                *light *= material.transmissive;
                false
            }
            _ => true,
        }
    }
}

/// A shadow ray parameterized so the light sits at `t = 1`.
pub(crate) struct Segment {
    pub ray: Ray,
    /// Open range of accepted blocker distances
    pub range: Interval,
}

impl Segment {
    /// `None` when the two points coincide.
    pub fn new(from: Vec3, to: Vec3) -> Option<Self> {
        let length = from.distance(to);
        if length == 0.0 {
            return None;
        }
        Some(Self {
            ray: Ray::between(from, to),
            range: Interval::new(EPSILON / length, 1.0),
        })
    }
}

/// Brute-force accelerator: every query tests every object.
///
/// Used for tiny scenes and as the reference the BVH is checked against.
#[derive(Debug, Clone)]
pub struct LinearScan {
    objects: SceneObjects,
}

impl LinearScan {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self {
            objects: SceneObjects::new(primitives),
        }
    }
}

impl Accelerator for LinearScan {
    fn objects(&self) -> &SceneObjects {
        &self.objects
    }

    fn nearest(&self, ray: &Ray) -> Option<(ObjectRef, Hit)> {
        let mut best = None;
        for &object in self.objects.planes().iter().chain(self.objects.bounded()) {
            self.objects.consider(object, ray, &mut best);
        }
        best
    }

    fn shadow(&self, from: Vec3, to: Vec3) -> Shadow {
        let Some(segment) = Segment::new(from, to) else {
            return Shadow::Lit(Color::ONE);
        };
        let mut light = Color::ONE;
        for &object in self.objects.planes().iter().chain(self.objects.bounded()) {
            if self.objects.block(object, &segment, &mut light) {
                return Shadow::Occluded;
            }
        }
        Shadow::Lit(light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::box_faces;
    use crate::{Mesh, Plane, Sphere};

    fn sphere(center: Vec3, radius: f32, material: Material) -> Primitive {
        Sphere::new(center, radius, material).unwrap().into()
    }

    #[test]
    fn test_meshes_are_flattened_into_triangles() {
        let objects = SceneObjects::new(vec![
            Plane::new(Vec3::ZERO, Vec3::Y, Material::default()).unwrap().into(),
            Mesh::new(box_faces(Vec3::ZERO, Vec3::ONE), Material::default()).unwrap().into(),
            sphere(Vec3::ZERO, 1.0, Material::default()),
        ]);

        assert_eq!(objects.planes(), &[ObjectRef::Primitive(0)]);
        assert_eq!(objects.bounded().len(), 13);
        assert_eq!(
            objects.bounded()[0],
            ObjectRef::MeshTriangle { mesh: 1, triangle: 0 }
        );
        assert_eq!(objects.bounded()[12], ObjectRef::Primitive(2));
    }

    #[test]
    fn test_linear_nearest_picks_closest() {
        let scan = LinearScan::new(vec![
            sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::default()),
            sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::default()),
        ]);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let (object, hit) = scan.nearest(&ray).unwrap();
        assert_eq!(object, ObjectRef::Primitive(1));
        assert!((hit.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_opaque_blocker_occludes() {
        let scan = LinearScan::new(vec![sphere(
            Vec3::new(0.0, 0.0, 5.0),
            1.0,
            Material::matte(Color::ONE),
        )]);
        assert_eq!(
            scan.shadow(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)),
            Shadow::Occluded
        );
    }

    #[test]
    fn test_transmissive_blockers_filter_light() {
        let glass = Material::default().with_transmissive(Color::splat(0.5), 1.0);
        let one = LinearScan::new(vec![sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, glass)]);
        assert_eq!(
            one.shadow(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)),
            Shadow::Lit(Color::splat(0.5))
        );

        let two = LinearScan::new(vec![
            sphere(Vec3::new(0.0, 0.0, 3.0), 1.0, glass),
            sphere(Vec3::new(0.0, 0.0, 7.0), 1.0, glass),
        ]);
        assert_eq!(
            two.shadow(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)),
            Shadow::Lit(Color::splat(0.25))
        );
    }

    #[test]
    fn test_blockers_beyond_the_light_are_ignored() {
        let scan = LinearScan::new(vec![sphere(
            Vec3::new(0.0, 0.0, 15.0),
            1.0,
            Material::matte(Color::ONE),
        )]);
        assert_eq!(
            scan.shadow(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)),
            Shadow::Lit(Color::ONE)
        );
    }

    #[test]
    fn test_shadow_ignores_surface_it_starts_on() {
        let scan = LinearScan::new(vec![sphere(Vec3::ZERO, 1.0, Material::matte(Color::ONE))]);
        let on_surface = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(
            scan.shadow(on_surface, Vec3::new(0.0, 10.0, 0.0)),
            Shadow::Lit(Color::ONE)
        );
    }
}
