//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce limit
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and 8-bit quantization at presentation time

use crate::error::{RenderError, Result};
use crate::random::gen_f32;
use crate::{Camera, Color, Hittable};
use lumen_math::{Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Bounces allowed before a surface hit returns black
    pub max_depth: u32,
    /// Lower bound of the hit interval, keeps bounced rays off their own surface
    pub t_min: f32,
    /// Jitter samples inside the pixel; when false every sample uses the pixel center
    pub jitter: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            samples_per_pixel: 12,
            max_depth: 50,
            t_min: 0.001,
            jitter: true,
        }
    }
}

impl RenderConfig {
    /// Check that the configuration describes a non-empty image.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray into the world. A miss returns the sky. A hit asks the
/// material for a bounce and multiplies its attenuation into the color of
/// the bounced ray, until `config.max_depth` bounces have been made or the
/// material absorbs the ray.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(config.t_min, f32::INFINITY)) else {
        return sky_gradient(ray);
    };

    if depth >= config.max_depth {
        return Color::ZERO;
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth + 1, config, rng)
        }
        None => Color::ZERO,
    }
}

/// Background: blends white into sky blue by the ray's vertical direction.
///
/// The blend factor is `0.5 * (y + 1)`, so straight down is white and
/// straight up is sky blue. The older `0.5 * y + 1.0` form overshoots past
/// sky blue for upward rays and gives different pixels.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one gamma-corrected channel: scale by 255.99 and truncate.
#[inline]
fn quantize(gamma: f32) -> u8 {
    // Float-to-int `as` truncates toward zero and saturates at 255
    (255.99_f64 * f64::from(gamma)) as u8
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        quantize(linear_to_gamma(color.x)),
        quantize(linear_to_gamma(color.y)),
        quantize(linear_to_gamma(color.z)),
    ]
}

/// Render a single pixel with multi-sampling.
///
/// Pixel (0, 0) is the top-left corner of the image. Returns the average
/// linear color of all samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.width as f32;
    let height = config.height as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let (du, dv) = if config.jitter {
            let du = gen_f32(rng);
            (du, gen_f32(rng))
        } else {
            (0.5, 0.5)
        };

        let s = (x as f32 + du) / width;
        let t = (height - (y as f32 + dv)) / height;

        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, 0, config, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Image buffer of linear colors, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
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

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Gamma-correct and quantize to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer on the calling thread.
///
/// Pixels are visited in row-major order from the top-left, all drawing
/// from `rng`, so a given generator state always produces the same image.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<ImageBuffer> {
    config.validate()?;
    log::debug!(
        "Rendering {}x{} @ {} spp, max depth {}",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth
    );

    let start = Instant::now();
    let mut image = ImageBuffer::new(config.width, config.height);

    for y in 0..config.height {
        for x in 0..config.width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!("Rendered {}x{} in {:?}", config.width, config.height, start.elapsed());
    Ok(image)
}
