//! Whole-image rendering.
//!
//! Rows are traced in parallel with rayon. Each row seeds its own RNG from
//! its index, so an image is reproducible whatever the thread count.

use crate::{Accelerator, Camera, Tracer};
use glint_core::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to 8-bit RGBA, clamping each channel.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)).round() as u8;
    let g = (255.0 * clamp_01(color.y)).round() as u8;
    let b = (255.0 * clamp_01(color.z)).round() as u8;
    [r, g, b, 255]
}

/// Row-major offset of pixel (x, y), widened before multiplying.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgba(c)).collect()
    }

    /// Convert to an `image` buffer ready to encode.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }
}

/// Color of pixel (x, y): the mean over the camera's targets, with misses
/// showing the background.
pub fn render_pixel<A: Accelerator>(
    tracer: &Tracer<A>,
    camera: &Camera,
    x: u32,
    y: u32,
    rng: &mut StdRng,
) -> Color {
    let background = tracer.config().background;
    let targets = camera.targets(x, y);

    let mut total = Color::ZERO;
    for &target in &targets {
        total += tracer
            .trace(camera.eye(), target, rng)
            .unwrap_or(background);
    }
    total / targets.len() as f32
}

/// Render the entire image.
///
/// The camera must already be initialized.
pub fn render<A: Accelerator>(tracer: &Tracer<A>, camera: &Camera) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    if image.pixels.is_empty() {
        return image;
    }

    log::info!(
        "Rendering {}x{}{}",
        camera.image_width,
        camera.image_height,
        if camera.antialias { " (antialiased)" } else { "" }
    );
    let start = Instant::now();

    let width = camera.image_width;
    image
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = StdRng::seed_from_u64(y as u64);
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(tracer, camera, x as u32, y as u32, &mut rng);
            }
        });

    log::info!("Rendered in {:.2?}", start.elapsed());
    image
}
