use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not normalized. Rays built with [`Ray::between`] use the
/// segment length as their unit, so `t = 1` lands exactly on the target point.
/// Shadow queries rely on that parameterization.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create the ray from `origin` through `target`.
    pub fn between(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
