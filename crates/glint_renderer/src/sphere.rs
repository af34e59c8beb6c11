//! Sphere primitive.

use crate::csg::{Crossing, Span};
use crate::Hit;
use glint_core::{Material, SceneError, SceneResult, SurfaceDetail};
use glint_math::{Aabb, Ray, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    detail: Option<SurfaceDetail>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> SceneResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidSphereRadius(radius));
        }
        Ok(Self {
            center,
            radius,
            material,
            detail: None,
        })
    }

    /// Attach a texture or bump map, addressed by [`Sphere::uv`].
    pub fn with_detail(mut self, detail: SurfaceDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn detail(&self) -> Option<&SurfaceDetail> {
        self.detail.as_ref()
    }

    /// Both parameters where the ray's line crosses the sphere, smaller first.
    fn roots(&self, ray: &Ray) -> Option<(f32, f32)> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        Some(((h - sqrtd) / a, (h + sqrtd) / a))
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    /// Nearest entry (or, with `want_exit`, exit) in front of the origin.
    ///
    /// A ray starting inside the sphere has no entry.
    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        let (near, far) = self.roots(ray)?;
        let t = if want_exit { far } else { near };
        if t <= 0.0 {
            return None;
        }
        let point = ray.at(t);
        Some(Hit {
            t,
            point,
            normal: self.normal_at(point),
        })
    }

    /// The full-line inside interval, for CSG.
    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        match self.roots(ray) {
            Some((near, far)) => vec![Span {
                entry: Crossing::new(near, self.normal_at(ray.at(near))),
                exit: Crossing::new(far, self.normal_at(ray.at(far))),
            }],
            None => Vec::new(),
        }
    }

    /// Spherical coordinates of a unit outward normal.
    pub fn uv(normal: Vec3) -> (f32, f32) {
        let u = 0.5 - (-normal.z).atan2(-normal.x) / (2.0 * PI);
        let v = 0.5 - normal.y.clamp(-1.0, 1.0).asin() / PI;
        (u, v)
    }

    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, Material::default()).unwrap()
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::between(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let hit = unit_sphere().intersect(&ray, false).unwrap();

        assert!((hit.t - 0.8).abs() < 1e-6);
        assert!((hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_hit_unit_direction() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = unit_sphere().intersect(&ray, false).unwrap();

        assert!((hit.t - 4.0).abs() < 1e-6);
        assert!((hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_exit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = unit_sphere().intersect(&ray, true).unwrap();

        assert!((hit.t - 6.0).abs() < 1e-6);
        assert!((hit.normal + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_from_inside_has_exit_only() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let sphere = unit_sphere();

        assert!(sphere.intersect(&ray, false).is_none());
        let exit = sphere.intersect(&ray, true).unwrap();
        assert!((exit.t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_miss() {
        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(unit_sphere().intersect(&ray, false).is_none());

        // Sphere behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().intersect(&ray, false).is_none());
    }

    #[test]
    fn test_sphere_spans_cover_full_line() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let spans = unit_sphere().spans(&ray);

        assert_eq!(spans.len(), 1);
        assert!((spans[0].entry.t + 1.0).abs() < 1e-6);
        assert!((spans[0].exit.t - 1.0).abs() < 1e-6);
        assert!((spans[0].entry.normal + Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_invalid_radius() {
        assert!(Sphere::new(Vec3::ZERO, 0.0, Material::default()).is_err());
        assert!(Sphere::new(Vec3::ZERO, f32::NAN, Material::default()).is_err());
    }

    #[test]
    fn test_sphere_uv_range() {
        for n in [Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::X] {
            let (u, v) = Sphere::uv(n);
            assert!((0.0..=1.0).contains(&u), "u={u}");
            assert!((0.0..=1.0).contains(&v), "v={v}");
        }
        // Poles map to the top and bottom rows
        assert!((Sphere::uv(Vec3::Y).1 - 0.0).abs() < 1e-6);
        assert!((Sphere::uv(-Vec3::Y).1 - 1.0).abs() < 1e-6);
    }
}
