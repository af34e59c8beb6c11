//! Reflection, refraction and local illumination terms.
//!
//! Vectors passed to `reflect`, `lambert` and `phong` point away from the
//! surface (toward the viewer or the light). `refract` takes the travel
//! direction of the incoming ray.

use crate::Vec3;

/// Mirror `v` about the normal `n`: `normalize(2(n.v)n - v)`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    (2.0 * n.dot(v) * n - v).normalize_or_zero()
}

/// Bend `incident` through a surface with outward normal `normal` and
/// refraction index `eta`.
///
/// The side is picked from the sign of `incident . normal`: a ray travelling
/// against the normal is entering (ratio `1/eta`), otherwise it is leaving
/// (ratio `eta`, normal flipped). Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let incident = incident.normalize_or_zero();
    let (ratio, n) = if incident.dot(normal) < 0.0 {
        (1.0 / eta, normal)
    } else {
        (eta, -normal)
    };

    let cos_i = -incident.dot(n);
    let k = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }

    Some((ratio * incident + (ratio * cos_i - k.sqrt()) * n).normalize_or_zero())
}

/// Same-side test of `p` against the three edges of triangle `(a, b, c)`.
///
/// `p` is assumed to lie in the triangle's plane; `normal` orients the edges.
pub fn point_in_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3, normal: Vec3) -> bool {
    let side = |from: Vec3, to: Vec3| (p - from).cross(to - from).dot(normal);
    let s0 = side(a, b);
    let s1 = side(b, c);
    let s2 = side(c, a);

    (s0 >= 0.0 && s1 >= 0.0 && s2 >= 0.0) || (s0 <= 0.0 && s1 <= 0.0 && s2 <= 0.0)
}

/// Lambert cosine term, clamped at zero.
#[inline]
pub fn lambert(normal: Vec3, to_light: Vec3) -> f32 {
    normal.dot(to_light).max(0.0)
}

/// Phong specular term `(R.V)^shininess` with `R = 2(N.L)N - L`.
///
/// Zero when the light is behind the surface or the reflection points away
/// from the viewer.
pub fn phong(normal: Vec3, to_light: Vec3, to_viewer: Vec3, shininess: f32) -> f32 {
    if normal.dot(to_light) <= 0.0 {
        return 0.0;
    }
    let r = reflect(to_light, normal);
    let r_dot_v = r.dot(to_viewer);
    if r_dot_v > 0.0 {
        r_dot_v.powf(shininess)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_reflect_mirrors_about_normal() {
        let v = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = reflect(v, Vec3::Y);
        assert!(approx(r, Vec3::new(-1.0, 1.0, 0.0).normalize()));
    }

    #[test]
    fn test_refract_index_one_is_straight() {
        let d = Vec3::new(0.3, -1.0, 0.2).normalize();
        let out = refract(d, Vec3::Y, 1.0).unwrap();
        assert!(approx(out, d));

        // Leaving the surface
        let out = refract(-d, Vec3::Y, 1.0).unwrap();
        assert!(approx(out, -d));
    }

    #[test]
    fn test_refract_bends_toward_normal_when_entering() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(d, Vec3::Y, 1.5).unwrap();

        let sin_in = d.x.abs();
        let sin_out = out.x.abs();
        assert!((sin_in / sin_out - 1.5).abs() < 1e-4);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at 60 degrees, past the ~41.8 degree critical angle
        let d = Vec3::new(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        assert!(refract(d, Vec3::Y, 1.5).is_none());

        // Below the critical angle it gets out
        let d = Vec3::new(30f32.to_radians().sin(), 30f32.to_radians().cos(), 0.0);
        assert!(refract(d, Vec3::Y, 1.5).is_some());
    }

    #[test]
    fn test_point_in_triangle() {
        let a = Vec3::ZERO;
        let b = Vec3::X;
        let c = Vec3::Y;
        let n = Vec3::Z;

        assert!(point_in_triangle(Vec3::new(0.2, 0.2, 0.0), a, b, c, n));
        assert!(!point_in_triangle(Vec3::new(0.8, 0.8, 0.0), a, b, c, n));
        // Winding does not matter
        assert!(point_in_triangle(Vec3::new(0.2, 0.2, 0.0), a, c, b, n));
    }

    #[test]
    fn test_lambert_clamps() {
        assert_eq!(lambert(Vec3::Y, Vec3::Y), 1.0);
        assert_eq!(lambert(Vec3::Y, -Vec3::Y), 0.0);
    }

    #[test]
    fn test_phong_peak_along_mirror_direction() {
        let l = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let v = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((phong(Vec3::Y, l, v, 20.0) - 1.0).abs() < 1e-4);

        // Viewer on the light's side sees a much weaker highlight
        assert!(phong(Vec3::Y, l, l, 20.0) < 1e-3);
    }
}
