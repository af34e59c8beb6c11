//! Light sources and direct illumination.
//!
//! Every light except ambient runs a shadow query per contribution and adds
//! Lambert diffuse plus Phong specular, scaled by whatever light makes it
//! through transmissive blockers.

use crate::accel::{Accelerator, Shadow};
use glint_core::{Color, Material, SceneError, SceneResult, DIRECTIONAL_LIGHT_DISTANCE};
use glint_math::{optics, Vec2, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Shading inputs at one surface point.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub point: Vec3,
    /// Unit outward normal (after any bump perturbation)
    pub normal: Vec3,
    /// Unit vector toward the viewer
    pub view: Vec3,
    /// Material after any texture override
    pub material: Material,
}

/// A scene light.
#[derive(Debug, Clone)]
pub enum Light {
    /// Uniform light with no direction and no shadows.
    Ambient { color: Color },
    /// Light arriving along `direction` from infinitely far away.
    Directional { color: Color, direction: Vec3 },
    Point { color: Color, position: Vec3 },
    /// Point light restricted to a cone of half-angle `cutoff` degrees.
    Spot {
        color: Color,
        position: Vec3,
        direction: Vec3,
        cutoff: f32,
    },
    Area(AreaLight),
}

impl Light {
    pub fn ambient(color: Color) -> Self {
        Light::Ambient { color }
    }

    pub fn directional(color: Color, direction: Vec3) -> SceneResult<Self> {
        let direction = direction
            .try_normalize()
            .ok_or(SceneError::ZeroVector("light direction"))?;
        Ok(Light::Directional { color, direction })
    }

    pub fn point(color: Color, position: Vec3) -> Self {
        Light::Point { color, position }
    }

    pub fn spot(color: Color, position: Vec3, direction: Vec3, cutoff: f32) -> SceneResult<Self> {
        let direction = direction
            .try_normalize()
            .ok_or(SceneError::ZeroVector("spot light direction"))?;
        Ok(Light::Spot {
            color,
            position,
            direction,
            cutoff,
        })
    }

    /// Light reflected toward the viewer from `surface`.
    pub fn illuminate(
        &self,
        surface: &Surface,
        index: &dyn Accelerator,
        rng: &mut dyn RngCore,
    ) -> Color {
        match self {
            Light::Ambient { color } => surface.material.ambient * *color,
            Light::Directional { color, direction } => {
                let to_light = -*direction;
                let far = surface.point + to_light * DIRECTIONAL_LIGHT_DISTANCE;
                shadowed(surface, index, far, *color)
            }
            Light::Point { color, position } => shadowed(surface, index, *position, *color),
            Light::Spot {
                color,
                position,
                direction,
                cutoff,
            } => {
                let to_light = (*position - surface.point).normalize_or_zero();
                if to_light.dot(-*direction) > cutoff.to_radians().cos() {
                    shadowed(surface, index, *position, *color)
                } else {
                    Color::ZERO
                }
            }
            Light::Area(area) => area.illuminate(surface, index, rng),
        }
    }
}

/// Diffuse plus specular from a light at `position`, after the shadow query.
fn shadowed(surface: &Surface, index: &dyn Accelerator, position: Vec3, color: Color) -> Color {
    match index.shadow(surface.point, position) {
        Shadow::Occluded => Color::ZERO,
        Shadow::Lit(filter) => {
            let to_light = (position - surface.point).normalize_or_zero();
            direct(surface, to_light, color * filter)
        }
    }
}

/// Lambert diffuse and Phong specular for light arriving along `to_light`.
fn direct(surface: &Surface, to_light: Vec3, intensity: Color) -> Color {
    let m = &surface.material;
    let diffuse = m.diffuse * intensity * optics::lambert(surface.normal, to_light);
    let specular =
        m.specular * intensity * optics::phong(surface.normal, to_light, surface.view, m.shininess);
    diffuse + specular
}

/// Outline of an area light in its own plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaShape {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

/// How sample positions are chosen on an area light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// Independent uniform samples on every call.
    Random,
    /// The centres of a fixed grid of cells, the same on every call.
    Stratified,
}

/// A finite emitter sampled to produce soft shadows.
#[derive(Debug, Clone)]
pub struct AreaLight {
    color: Color,
    position: Vec3,
    shape: AreaShape,
    samples: u32,
    sampling: Sampling,
    plane_x: Vec3,
    plane_y: Vec3,
}

impl AreaLight {
    /// Rectangle centred on `position`, facing `normal`, its width running
    /// along `orientation x normal`.
    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        color: Color,
        position: Vec3,
        normal: Vec3,
        orientation: Vec3,
        width: f32,
        height: f32,
        samples: u32,
        sampling: Sampling,
    ) -> SceneResult<Self> {
        if !(width > 0.0) {
            return Err(SceneError::InvalidLightExtent("width"));
        }
        if !(height > 0.0) {
            return Err(SceneError::InvalidLightExtent("height"));
        }
        let normal = normal
            .try_normalize()
            .ok_or(SceneError::ZeroVector("area light normal"))?;
        let plane_x = orientation
            .cross(normal)
            .try_normalize()
            .ok_or(SceneError::ZeroVector("area light orientation"))?;
        let plane_y = normal.cross(plane_x).normalize_or_zero();

        Self::build(
            color,
            position,
            AreaShape::Rect { width, height },
            samples,
            sampling,
            plane_x,
            plane_y,
        )
    }

    /// Disk centred on `position`, facing `normal`.
    pub fn circle(
        color: Color,
        position: Vec3,
        normal: Vec3,
        radius: f32,
        samples: u32,
        sampling: Sampling,
    ) -> SceneResult<Self> {
        if !(radius > 0.0) {
            return Err(SceneError::InvalidLightExtent("radius"));
        }
        let normal = normal
            .try_normalize()
            .ok_or(SceneError::ZeroVector("area light normal"))?;
        let plane_x = match Vec3::Y.cross(normal).try_normalize() {
            Some(x) => x,
            None => {
                log::debug!("Area light faces world up, building its frame from +Z");
                Vec3::Z.cross(normal).normalize_or_zero()
            }
        };
        let plane_y = normal.cross(plane_x).normalize_or_zero();

        Self::build(
            color,
            position,
            AreaShape::Circle { radius },
            samples,
            sampling,
            plane_x,
            plane_y,
        )
    }

    fn build(
        color: Color,
        position: Vec3,
        shape: AreaShape,
        samples: u32,
        sampling: Sampling,
        plane_x: Vec3,
        plane_y: Vec3,
    ) -> SceneResult<Self> {
        if samples == 0 {
            return Err(SceneError::ZeroLightSamples);
        }
        Ok(Self {
            color,
            position,
            shape,
            samples,
            sampling,
            plane_x,
            plane_y,
        })
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Unit-square coordinates of sample `index` in [0, 1)^2.
    fn unit_sample(&self, index: u32, rng: &mut dyn RngCore) -> Vec2 {
        match self.sampling {
            Sampling::Random => Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()),
            Sampling::Stratified => {
                // Every cell has area 1/N: a row's height is its share of the
                // samples, so a short last row is thinner and spans the full width.
                let n = self.samples;
                let cols = (n as f32).sqrt().ceil().max(1.0) as u32;
                let (cx, cy) = (index % cols, index / cols);
                let first = cy * cols;
                let row_len = cols.min(n - first);
                Vec2::new(
                    (cx as f32 + 0.5) / row_len as f32,
                    (first as f32 + 0.5 * row_len as f32) / n as f32,
                )
            }
        }
    }

    /// World position of sample `index`. A single-sample light uses its centre.
    fn sample_point(&self, index: u32, rng: &mut dyn RngCore) -> Vec3 {
        if self.samples == 1 {
            return self.position;
        }
        let s = self.unit_sample(index, rng);
        let offset = match self.shape {
            AreaShape::Rect { width, height } => {
                Vec2::new((s.x - 0.5) * width, (s.y - 0.5) * height)
            }
            AreaShape::Circle { radius } => {
                let r = radius * s.x.sqrt();
                let angle = 2.0 * PI * s.y;
                Vec2::new(r * angle.cos(), r * angle.sin())
            }
        };
        self.position + self.plane_x * offset.x + self.plane_y * offset.y
    }

    /// Mean of the shadowed direct term over all samples.
    pub fn illuminate(
        &self,
        surface: &Surface,
        index: &dyn Accelerator,
        rng: &mut dyn RngCore,
    ) -> Color {
        let total: Color = (0..self.samples)
            .map(|i| {
                let point = self.sample_point(i, rng);
                shadowed(surface, index, point, self.color)
            })
            .sum();
        total / self.samples as f32
    }
}

impl From<AreaLight> for Light {
    fn from(area: AreaLight) -> Self {
        Light::Area(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisBox, LinearScan, Primitive, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor_point(material: Material) -> Surface {
        Surface {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            view: Vec3::Y,
            material,
        }
    }

    fn empty_scene() -> LinearScan {
        LinearScan::new(Vec::new())
    }

    #[test]
    fn test_ambient_ignores_geometry() {
        let surface = floor_point(Material::default().with_ambient(Color::new(0.2, 0.4, 0.6)));
        let mut rng = StdRng::seed_from_u64(1);
        let c = Light::ambient(Color::splat(0.5)).illuminate(&surface, &empty_scene(), &mut rng);
        assert_eq!(c, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_point_light_lambert() {
        let surface = floor_point(Material::matte(Color::ONE));
        let mut rng = StdRng::seed_from_u64(1);

        let overhead = Light::point(Color::ONE, Vec3::new(0.0, 5.0, 0.0));
        let c = overhead.illuminate(&surface, &empty_scene(), &mut rng);
        assert!((c - Color::ONE).length() < 1e-5);

        // 60 degrees off the normal
        let slanted = Light::point(Color::ONE, Vec3::new(60f32.to_radians().tan(), 1.0, 0.0));
        let c = slanted.illuminate(&surface, &empty_scene(), &mut rng);
        assert!((c.x - 0.5).abs() < 1e-4);

        // Below the surface
        let below = Light::point(Color::ONE, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(below.illuminate(&surface, &empty_scene(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_directional_light() {
        let surface = floor_point(Material::matte(Color::ONE));
        let mut rng = StdRng::seed_from_u64(1);
        let sun = Light::directional(Color::splat(0.8), -Vec3::Y).unwrap();
        let c = sun.illuminate(&surface, &empty_scene(), &mut rng);
        assert!((c - Color::splat(0.8)).length() < 1e-5);

        // A far blocker still casts a shadow
        let blocker: Primitive = Sphere::new(Vec3::new(0.0, 500.0, 0.0), 2.0, Material::matte(Color::ONE))
            .unwrap()
            .into();
        let scene = LinearScan::new(vec![blocker]);
        assert_eq!(sun.illuminate(&surface, &scene, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_spot_light_cone() {
        let surface = floor_point(Material::matte(Color::ONE));
        let mut rng = StdRng::seed_from_u64(1);

        let aimed = Light::spot(Color::ONE, Vec3::new(0.0, 4.0, 0.0), -Vec3::Y, 20.0).unwrap();
        assert!(aimed.illuminate(&surface, &empty_scene(), &mut rng).x > 0.9);

        // Same light tilted 45 degrees away: the point falls outside the cone
        let away = Light::spot(Color::ONE, Vec3::new(0.0, 4.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 20.0)
            .unwrap();
        assert_eq!(away.illuminate(&surface, &empty_scene(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_specular_highlight() {
        let surface = Surface {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            view: Vec3::new(1.0, 1.0, 0.0).normalize(),
            material: Material::default().with_specular(Color::ONE, 50.0),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let light = Light::point(Color::ONE, Vec3::new(-3.0, 3.0, 0.0));
        let c = light.illuminate(&surface, &empty_scene(), &mut rng);
        assert!((c - Color::ONE).length() < 1e-3);
    }

    #[test]
    fn test_single_sample_area_light_is_a_point_light() {
        let blocker: Primitive = Sphere::new(Vec3::new(0.3, 2.0, 0.0), 0.5, Material::matte(Color::ONE))
            .unwrap()
            .into();
        let scene = LinearScan::new(vec![blocker]);
        let light_pos = Vec3::new(0.0, 4.0, 0.0);
        let point = Light::point(Color::ONE, light_pos);
        let area: Light = AreaLight::rect(
            Color::ONE,
            light_pos,
            -Vec3::Y,
            Vec3::X,
            2.0,
            2.0,
            1,
            Sampling::Random,
        )
        .unwrap()
        .into();

        let mut rng = StdRng::seed_from_u64(3);
        for x in [-2.0f32, -0.5, 0.0, 0.2, 0.5, 1.0, 2.0] {
            let surface = Surface {
                point: Vec3::new(x, 0.0, 0.0),
                ..floor_point(Material::matte(Color::ONE))
            };
            assert_eq!(
                area.illuminate(&surface, &scene, &mut rng),
                point.illuminate(&surface, &scene, &mut rng)
            );
        }
    }

    #[test]
    fn test_area_light_soft_shadow_is_partial() {
        // A small blocker covers part of a large light
        let blocker: Primitive = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.3, Material::matte(Color::ONE))
            .unwrap()
            .into();
        let scene = LinearScan::new(vec![blocker]);
        let area = AreaLight::rect(
            Color::ONE,
            Vec3::new(0.0, 4.0, 0.0),
            -Vec3::Y,
            Vec3::X,
            4.0,
            4.0,
            64,
            Sampling::Stratified,
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let c = area.illuminate(&floor_point(Material::matte(Color::ONE)), &scene, &mut rng);
        assert!(c.x > 0.0 && c.x < 0.95, "penumbra value {}", c.x);
    }

    #[test]
    fn test_stratified_and_random_estimates_agree() {
        let surface = floor_point(Material::matte(Color::ONE));
        let mut rng = StdRng::seed_from_u64(11);

        for (random, stratified) in [
            (
                AreaLight::rect(Color::ONE, Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, Vec3::Z, 3.0, 1.0, 2500, Sampling::Random),
                AreaLight::rect(Color::ONE, Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, Vec3::Z, 3.0, 1.0, 2500, Sampling::Stratified),
            ),
            (
                AreaLight::circle(Color::ONE, Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.5, 2500, Sampling::Random),
                AreaLight::circle(Color::ONE, Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.5, 2500, Sampling::Stratified),
            ),
        ] {
            let a = random.unwrap().illuminate(&surface, &empty_scene(), &mut rng);
            let b = stratified.unwrap().illuminate(&surface, &empty_scene(), &mut rng);
            assert!((a.x - b.x).abs() < 0.02, "random {} vs stratified {}", a.x, b.x);
        }
    }

    #[test]
    fn test_stratified_grid_is_centred_for_any_count() {
        let mut rng = StdRng::seed_from_u64(0);
        for n in 1..=30 {
            let light = AreaLight::rect(
                Color::ONE,
                Vec3::ZERO,
                -Vec3::Y,
                Vec3::X,
                1.0,
                1.0,
                n,
                Sampling::Stratified,
            )
            .unwrap();
            let cells: Vec<Vec2> = (0..n).map(|i| light.unit_sample(i, &mut rng)).collect();
            assert!(cells
                .iter()
                .all(|c| c.x > 0.0 && c.x < 1.0 && c.y > 0.0 && c.y < 1.0));

            let mean = cells.iter().copied().sum::<Vec2>() / n as f32;
            assert!((mean - Vec2::splat(0.5)).length() < 1e-4, "n = {n}, mean {mean}");

            let (low, high) = cells
                .iter()
                .fold((1.0f32, 0.0f32), |(lo, hi), c| (lo.min(c.y), hi.max(c.y)));
            assert!((low + high - 1.0).abs() < 0.25, "n = {n}, v in [{low}, {high}]");
        }
    }

    #[test]
    fn test_half_blocked_light_with_non_square_sample_counts() {
        // The light's v axis runs along +X; the slab shades the whole +X half
        let blocker: Primitive = AxisBox::new(
            Vec3::new(0.0, 0.9, -3.0),
            Vec3::new(3.0, 1.1, 3.0),
            Material::matte(Color::ONE),
        )
        .unwrap()
        .into();
        let scene = LinearScan::new(vec![blocker]);
        let surface = floor_point(Material::matte(Color::ONE));
        let light = |samples, sampling| {
            AreaLight::rect(
                Color::ONE,
                Vec3::new(0.0, 2.0, 0.0),
                -Vec3::Y,
                Vec3::X,
                2.0,
                2.0,
                samples,
                sampling,
            )
            .unwrap()
        };

        let mut rng = StdRng::seed_from_u64(5);
        let reference = light(40_000, Sampling::Random).illuminate(&surface, &scene, &mut rng);
        assert!((reference.x - 0.465).abs() < 0.02, "random estimate {}", reference.x);

        for n in [6, 20, 42] {
            let c = light(n, Sampling::Stratified).illuminate(&surface, &scene, &mut rng);
            assert!(
                (c.x - reference.x).abs() < 0.02,
                "n = {n}: stratified {} vs random {}",
                c.x,
                reference.x
            );
        }
    }

    #[test]
    fn test_stratified_samples_stay_on_the_light() {
        let light = AreaLight::rect(
            Color::ONE,
            Vec3::ZERO,
            Vec3::Y,
            Vec3::Z,
            2.0,
            4.0,
            10,
            Sampling::Stratified,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for i in 0..10 {
            let p = light.sample_point(i, &mut rng);
            // Width runs along Z x Y = -X, height along +Z
            assert!(p.y.abs() < 1e-6);
            assert!(p.x.abs() <= 1.0 + 1e-5 && p.z.abs() <= 2.0 + 1e-5);
        }
    }

    #[test]
    fn test_circle_frame_fallback_when_facing_up() {
        let light = AreaLight::circle(Color::ONE, Vec3::ZERO, Vec3::Y, 1.0, 4, Sampling::Random).unwrap();
        assert!(light.plane_x.is_finite() && light.plane_x.length() > 0.99);
        assert!(light.plane_y.dot(Vec3::Y).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_area_lights() {
        let zero = AreaLight::circle(Color::ONE, Vec3::ZERO, -Vec3::Y, 1.0, 0, Sampling::Random);
        assert_eq!(zero.unwrap_err(), SceneError::ZeroLightSamples);

        let flat = AreaLight::rect(Color::ONE, Vec3::ZERO, -Vec3::Y, Vec3::X, 0.0, 1.0, 4, Sampling::Random);
        assert_eq!(flat.unwrap_err(), SceneError::InvalidLightExtent("width"));

        let parallel = AreaLight::rect(Color::ONE, Vec3::ZERO, Vec3::Y, Vec3::Y, 1.0, 1.0, 4, Sampling::Random);
        assert_eq!(
            parallel.unwrap_err(),
            SceneError::ZeroVector("area light orientation")
        );
    }
}
