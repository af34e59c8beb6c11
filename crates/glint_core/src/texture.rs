//! Texture and bump-map capability for shading.
//!
//! The tracer only ever asks two questions of surface detail: "what color is
//! the surface at (u, v)?" and "how does the normal tilt at (u, v)?". Both are
//! expressed as traits so image decoding stays outside the renderer.

use std::fmt;
use std::sync::Arc;

use glint_math::Vec3;

use crate::{Color, Material, SceneError, SceneResult};

/// Color lookup at surface coordinates.
pub trait TextureSampler: Send + Sync {
    /// Sample at UV coordinates in [0, 1]; values outside wrap.
    fn sample(&self, u: f32, v: f32) -> Color;
}

/// Scalar height lookup on an integer grid, used for bump mapping.
pub trait HeightField: Send + Sync {
    /// Grid size as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Height at texel (x, y). Callers keep coordinates in range.
    fn height(&self, x: u32, y: u32) -> f32;
}

/// An in-memory texture with pixel data.
///
/// Stores pixels in linear RGBA float format. As a height field it reads the
/// red channel.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (linear, 0-1 range), row-major order
    pub pixels: Vec<[f32; 4]>,

    /// Where the texels came from (for debugging)
    pub label: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        label: impl Into<String>,
    ) -> SceneResult<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(SceneError::InvalidTexture {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            label: label.into(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            label: "<solid>".to_string(),
        }
    }

    /// Convert an already decoded 8-bit sRGB image to linear texels.
    pub fn from_rgba8(image: &image::RgbaImage, label: impl Into<String>) -> SceneResult<Self> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| {
                [
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                    p[3] as f32 / 255.0, // Alpha is linear
                ]
            })
            .collect();

        let texture = Self::new(width, height, pixels, label)?;
        log::debug!(
            "Converted texture: {} ({}x{})",
            texture.label,
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels
            .get(texel_index(self.width, x, y))
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }

    /// Texel containing (u, v), no filtering.
    fn texel(&self, u: f32, v: f32) -> (u32, u32) {
        let x = (u.rem_euclid(1.0) * self.width as f32) as u32;
        let y = (v.rem_euclid(1.0) * self.height as f32) as u32;
        (x.min(self.width - 1), y.min(self.height - 1))
    }
}

impl TextureSampler for Texture {
    fn sample(&self, u: f32, v: f32) -> Color {
        let (x, y) = self.texel(u, v);
        let p = self.get_pixel(x, y);
        Color::new(p[0], p[1], p[2])
    }
}

impl HeightField for Texture {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn height(&self, x: u32, y: u32) -> f32 {
        self.get_pixel(x, y)[0]
    }
}

/// Per-surface override applied at shading time.
#[derive(Clone)]
pub enum SurfaceDetail {
    /// Replace ambient and diffuse color with the sampled texel.
    Texture(Arc<dyn TextureSampler>),
    /// Tilt the normal by the height field's finite-difference gradient.
    Bump { map: Arc<dyn HeightField>, depth: f32 },
}

impl fmt::Debug for SurfaceDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceDetail::Texture(_) => f.write_str("SurfaceDetail::Texture"),
            SurfaceDetail::Bump { map, depth } => f
                .debug_struct("SurfaceDetail::Bump")
                .field("dimensions", &map.dimensions())
                .field("depth", depth)
                .finish(),
        }
    }
}

impl SurfaceDetail {
    /// Shading inputs after applying this detail at (u, v).
    pub fn apply(&self, material: Material, normal: Vec3, u: f32, v: f32) -> (Material, Vec3) {
        match self {
            SurfaceDetail::Texture(sampler) => {
                let color = sampler.sample(u, v);
                let material = Material {
                    ambient: color,
                    diffuse: color,
                    ..material
                };
                (material, normal)
            }
            SurfaceDetail::Bump { map, depth } => {
                (material, bump_normal(map.as_ref(), *depth, normal, u, v))
            }
        }
    }
}

/// Perturb `normal` by the height gradient at (u, v).
///
/// Gradients are forward differences to the next texel in each direction,
/// wrapping at the edges. The tangent frame is built from world up.
pub fn bump_normal(map: &dyn HeightField, depth: f32, normal: Vec3, u: f32, v: f32) -> Vec3 {
    let (width, height) = map.dimensions();
    if width == 0 || height == 0 {
        return normal;
    }

    let x = ((u * width as f32) as i64).rem_euclid(width as i64) as u32;
    let y = ((v * height as f32) as i64).rem_euclid(height as i64) as u32;

    let h = map.height(x, y);
    let grad_u = map.height((x + 1) % width, y) - h;
    let grad_v = map.height(x, (y + 1) % height) - h;

    let tangent_u = Vec3::Y.cross(normal).try_normalize().unwrap_or(Vec3::X);
    let tangent_v = normal.cross(tangent_u).normalize_or_zero();

    (normal + grad_u * depth * tangent_u + grad_v * depth * tangent_v).normalize_or_zero()
}

/// Row-major offset of texel (x, y), widened before multiplying.
#[inline]
fn texel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        let black = [0.0, 0.0, 0.0, 1.0];
        let white = [1.0, 1.0, 1.0, 1.0];
        Texture::new(2, 2, vec![black, white, white, black], "checker").unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        let sample = tex.sample(0.5, 0.5);
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_nearest_lookup() {
        let tex = checker();
        assert_eq!(tex.sample(0.25, 0.25), Color::ZERO);
        assert_eq!(tex.sample(0.75, 0.25), Color::ONE);
        assert_eq!(tex.sample(0.25, 0.75), Color::ONE);
        // u = 1.0 wraps to the first column
        assert_eq!(tex.sample(1.0, 0.25), Color::ZERO);
    }

    #[test]
    fn test_non_square_lookup_is_row_major() {
        // 3 wide, 2 tall: texel (x, y) stores x + 10 * y in red
        let pixels = (0..2)
            .flat_map(|y| (0..3).map(move |x| [(x + 10 * y) as f32, 0.0, 0.0, 1.0]))
            .collect();
        let tex = Texture::new(3, 2, pixels, "wide").unwrap();
        assert_eq!(tex.sample(0.9, 0.1).x, 2.0);
        assert_eq!(tex.sample(0.1, 0.9).x, 10.0);
        assert_eq!(tex.sample(0.5, 0.75).x, 11.0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_texel_index_does_not_wrap() {
        assert_eq!(texel_index(70_000, 5, 70_000), 70_000usize * 70_000 + 5);
    }

    #[test]
    fn test_texture_size_mismatch_is_rejected() {
        let err = Texture::new(2, 2, vec![[0.0; 4]; 3], "short").unwrap_err();
        assert!(matches!(err, SceneError::InvalidTexture { len: 3, .. }));
    }

    #[test]
    fn test_from_rgba8_linearizes() {
        let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([255, 128, 0, 255]));
        let tex = Texture::from_rgba8(&img, "memory").unwrap();

        let c = tex.sample(0.0, 0.0);
        assert!((c.x - 1.0).abs() < 0.001);
        assert!(c.y > 0.1 && c.y < 0.5);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_flat_height_field_keeps_normal() {
        let flat = Texture::solid_color(Color::splat(0.5));
        let n = Vec3::new(0.3, 0.4, 0.5).normalize();
        let bumped = bump_normal(&flat, 2.0, n, 0.3, 0.7);
        assert!((bumped - n).length() < 1e-6);
    }

    #[test]
    fn test_gradient_tilts_normal() {
        let ramp = Texture::new(
            2,
            1,
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0]],
            "ramp",
        )
        .unwrap();

        let n = Vec3::Z;
        let bumped = bump_normal(&ramp, 0.5, n, 0.0, 0.0);
        let tangent_u = Vec3::Y.cross(n).normalize();

        assert!((bumped.length() - 1.0).abs() < 1e-5);
        assert!(bumped.dot(tangent_u) > 0.1);
    }

    #[test]
    fn test_texture_detail_overrides_color() {
        let detail = SurfaceDetail::Texture(Arc::new(Texture::solid_color(Color::new(0.2, 0.4, 0.6))));
        let material = Material::matte(Color::ONE).with_specular(Color::ONE, 8.0);

        let (shaded, normal) = detail.apply(material, Vec3::Y, 0.1, 0.9);
        assert_eq!(shaded.ambient, Color::new(0.2, 0.4, 0.6));
        assert_eq!(shaded.diffuse, Color::new(0.2, 0.4, 0.6));
        assert_eq!(shaded.specular, Color::ONE);
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
