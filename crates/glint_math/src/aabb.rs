use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for the BVH and for box primitives.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Parametric range where a ray's line passes through the three slabs of a box.
///
/// `near_axis`/`far_axis` name the slab that produced each bound, which is
/// what box primitives turn into a face normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SlabSpan {
    pub near: f32,
    pub far: f32,
    pub near_axis: usize,
    pub far_axis: usize,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Create the AABB shared by two AABBs. Empty when they do not touch.
    pub fn overlap(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::overlap(&box0.x, &box1.x),
            y: Interval::overlap(&box0.y, &box1.y),
            z: Interval::overlap(&box0.z, &box1.z),
        }
    }

    /// Returns true when any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Lower corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Upper corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Kay-Kajiya slab test over the full line of the ray.
    ///
    /// Returns `None` when the line misses the box. An axis the ray runs
    /// parallel to only constrains the result if the origin lies outside that
    /// slab, in which case the line misses.
    pub fn slab(&self, ray: &Ray) -> Option<SlabSpan> {
        let mut span = SlabSpan {
            near: f32::NEG_INFINITY,
            far: f32::INFINITY,
            near_axis: 0,
            far_axis: 0,
        };

        for axis in 0..3 {
            let bounds = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];

            if dir == 0.0 {
                if !bounds.contains(origin) {
                    return None;
                }
                continue;
            }

            let adinv = 1.0 / dir;
            let mut t0 = (bounds.min - origin) * adinv;
            let mut t1 = (bounds.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > span.near {
                span.near = t0;
                span.near_axis = axis;
            }
            if t1 < span.far {
                span.far = t1;
                span.far_axis = axis;
            }
            if span.near > span.far {
                return None;
            }
        }

        Some(span)
    }

    /// Distance at which the ray enters the box.
    ///
    /// `None` on a miss or when the box lies entirely behind the origin,
    /// `Some(0.0)` when the origin is inside, else the positive entry distance.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let span = self.slab(ray)?;
        if span.far < 0.0 {
            None
        } else if span.near < 0.0 {
            Some(0.0)
        } else {
            Some(span.near)
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self.slab(ray) {
            Some(span) => span.near.max(ray_t.min) <= span.far.min(ray_t.max),
            None => false,
        }
    }

    /// Grow every axis by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Aabb {
        Aabb::new(self.x.expand(delta), self.y.expand(delta), self.z.expand(delta))
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    pub fn pad_to_minimums(&self) -> Aabb {
        let delta = 0.0001;
        let pad = |i: Interval| if i.size() < delta { i.expand(delta) } else { i };
        Aabb::new(pad(self.x), pad(self.y), pad(self.z))
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties go to the lower axis.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size && x_size >= z_size {
            0
        } else if y_size >= z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_surrounding_and_overlap() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));

        let surrounding = Aabb::surrounding(&box1, &box2);
        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);

        let overlap = Aabb::overlap(&box1, &box2);
        assert_eq!(overlap.min(), Vec3::splat(3.0));
        assert_eq!(overlap.max(), Vec3::splat(5.0));

        let far = Aabb::from_points(Vec3::splat(20.0), Vec3::splat(21.0));
        assert!(Aabb::overlap(&box1, &far).is_empty());
    }

    #[test]
    fn test_aabb_intersect_entry_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(unit_box().intersect(&ray), Some(4.0));
    }

    #[test]
    fn test_aabb_intersect_origin_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.2, 1.0));
        assert_eq!(unit_box().intersect(&ray), Some(0.0));
    }

    #[test]
    fn test_aabb_intersect_misses() {
        // Box behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(unit_box().intersect(&ray), None);

        // Ray passing beside the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(unit_box().intersect(&ray), None);

        // Parallel to a slab with the origin outside it
        let ray = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(unit_box().intersect(&ray), None);
    }

    #[test]
    fn test_aabb_slab_axes() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let span = unit_box().slab(&ray).unwrap();

        assert_eq!(span.near, 4.0);
        assert_eq!(span.far, 6.0);
        assert_eq!(span.near_axis, 0);
        assert_eq!(span.far_axis, 0);
    }

    #[test]
    fn test_aabb_hit_segment() {
        let aabb = unit_box();
        let ray = Ray::between(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 5.0));

        assert!(aabb.hit(&ray, Interval::new(0.0, 1.0)));
        // Segment ends before reaching the box
        assert!(!aabb.hit(&ray, Interval::new(0.0, 0.3)));
    }

    #[test]
    fn test_aabb_centroid() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.centroid(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_aabb_longest_axis() {
        let aabb_x = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(aabb_x.longest_axis(), 0);

        let aabb_y = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), 1);

        let aabb_z = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), 2);
    }

    #[test]
    fn test_aabb_longest_axis_ties_prefer_lower_axis() {
        let cube = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(cube.longest_axis(), 0);

        let yz = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 4.0, 4.0));
        assert_eq!(yz.longest_axis(), 1);
    }

    #[test]
    fn test_aabb_pad_to_minimums() {
        let flat = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)).pad_to_minimums();
        assert!(flat.z.size() > 0.0);
        assert_eq!(flat.x.size(), 1.0);
    }
}
