//! Whitted-style surface materials.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB color.
pub type Color = Vec3;

/// Surface coefficients used by the shading engine.
///
/// Materials are plain values, built once during scene setup and copied into
/// every shading call that needs them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance (scales ambient lights)
    pub ambient: Color,

    /// Lambertian diffuse reflectance
    pub diffuse: Color,

    /// Phong specular reflectance
    pub specular: Color,

    /// Phong exponent
    pub shininess: f32,

    /// Mirror reflectance; zero disables reflection rays
    pub reflective: Color,

    /// Transmittance; zero disables refraction rays and makes the surface
    /// fully opaque to shadow rays
    pub transmissive: Color,

    /// Index of refraction; zero lets rays pass straight through
    pub refraction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            shininess: 1.0,
            reflective: Color::ZERO,
            transmissive: Color::ZERO,
            refraction: 0.0,
        }
    }
}

impl Material {
    /// Matte surface that responds to both ambient and diffuse light with `color`.
    pub fn matte(color: Color) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            ..Self::default()
        }
    }

    /// Set the ambient reflectance.
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Set the diffuse reflectance.
    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Set the Phong highlight.
    pub fn with_specular(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Set the mirror reflectance.
    pub fn with_reflective(mut self, reflective: Color) -> Self {
        self.reflective = reflective;
        self
    }

    /// Set the transmittance and index of refraction.
    pub fn with_transmissive(mut self, transmissive: Color, refraction: f32) -> Self {
        self.transmissive = transmissive;
        self.refraction = refraction;
        self
    }

    pub fn is_reflective(&self) -> bool {
        self.reflective != Color::ZERO
    }

    pub fn is_transmissive(&self) -> bool {
        self.transmissive != Color::ZERO
    }
}
