//! Camera for ray generation.

use glint_core::RenderConfig;
use glint_math::{Vec2, Vec3};

/// Sub-pixel offsets averaged when antialiasing is on.
const QUARTER_OFFSETS: [Vec2; 4] = [
    Vec2::new(0.25, 0.25),
    Vec2::new(0.75, 0.25),
    Vec2::new(0.25, 0.75),
    Vec2::new(0.75, 0.75),
];

/// Pinhole camera producing one target point per (sub-)pixel.
///
/// Rays run from the eye through points on a view plane one unit in front
/// of it. Row 0 is the top of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub antialias: bool,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    facing: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            antialias: false,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 60.0,
            facing: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::X,
            up: Vec3::Y,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Take resolution, field of view and antialiasing from a render config.
    pub fn with_config(mut self, config: &RenderConfig) -> Self {
        self.image_width = config.image_width;
        self.image_height = config.image_height;
        self.vfov = config.field_of_view;
        self.antialias = config.antialias;
        self
    }

    /// Initialize the camera (must be called before generating targets).
    pub fn initialize(&mut self) {
        let half_height = (self.vfov.to_radians() / 2.0).tan();
        let aspect = self.image_width.max(1) as f32 / self.image_height.max(1) as f32;
        let half_width = half_height * aspect;

        // Camera basis
        self.facing = (self.look_at - self.look_from)
            .try_normalize()
            .unwrap_or(Vec3::new(0.0, 0.0, -1.0));
        let right = self
            .facing
            .cross(self.vup)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let up = right.cross(self.facing);

        self.right = right * half_width;
        self.up = up * half_height;
    }

    pub fn eye(&self) -> Vec3 {
        self.look_from
    }

    /// Point on the view plane for pixel (x, y) at sub-pixel `offset` in [0, 1)^2.
    pub fn pixel_target(&self, x: u32, y: u32, offset: Vec2) -> Vec3 {
        let sx = 2.0 * ((x as f32 + offset.x) / self.image_width as f32 - 0.5);
        let sy = 1.0 - 2.0 * (y as f32 + offset.y) / self.image_height as f32;
        self.look_from + self.facing + self.right * sx + self.up * sy
    }

    /// Targets traced for pixel (x, y): the centre, or four quarter offsets
    /// when antialiasing.
    pub fn targets(&self, x: u32, y: u32) -> Vec<Vec3> {
        if self.antialias {
            QUARTER_OFFSETS
                .iter()
                .map(|&offset| self.pixel_target(x, y, offset))
                .collect()
        } else {
            vec![self.pixel_target(x, y, Vec2::splat(0.5))]
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
