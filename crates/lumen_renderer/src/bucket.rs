//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each bucket owns its own generator, seeded
//! from the global seed and the bucket's grid index, so the image does not
//! depend on how buckets are scheduled across threads.

use crate::error::Result;
use crate::renderer::{render_pixel, ImageBuffer, RenderConfig};
use crate::{Camera, Color, Hittable, XorShift};
use rayon::prelude::*;
use std::time::Instant;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Row-major position of this bucket in the grid
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering an image, in row-major grid order.
///
/// Edge buckets are clipped to the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Seed for a bucket's generator.
///
/// Mixes the bucket index into the global seed (splitmix32 finalizer) so
/// that neighbouring buckets get unrelated streams.
pub fn bucket_seed(seed: u32, index: usize) -> u32 {
    let mut z = seed.wrapping_add((index as u32).wrapping_add(1).wrapping_mul(0x9E37_79B9));
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    seed: u32,
) -> BucketResult {
    let mut rng = XorShift::new(bucket_seed(seed, bucket.index));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(camera, world, global_x, global_y, config, &mut rng);
            pixels.push(color);
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy this bucket's pixels into their place in the full image.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let mut colors = self.pixels.iter();
        for local_y in 0..self.bucket.height {
            for local_x in 0..self.bucket.width {
                if let Some(color) = colors.next() {
                    image.set(self.bucket.x + local_x, self.bucket.y + local_y, *color);
                }
            }
        }
    }
}

/// Render the entire scene across all rayon worker threads.
///
/// The output depends only on the scene, camera, configuration and `seed`;
/// it is identical for any thread count.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    seed: u32,
) -> Result<ImageBuffer> {
    config.validate()?;

    let buckets = generate_buckets(config.width, config.height, DEFAULT_BUCKET_SIZE);
    log::debug!(
        "Rendering {}x{} @ {} spp, max depth {}, {} buckets on {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, world, config, seed);
            log::trace!(
                "Bucket {} done ({}x{} at {},{})",
                bucket.index,
                bucket.width,
                bucket.height,
                bucket.x,
                bucket.y
            );
            result
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Rendered {}x{} in {:?}", config.width, config.height, start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraConfig, Material, Scene, Sphere};
    use lumen_math::Vec3;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
        assert_eq!(buckets[3], Bucket::new(64, 64, 36, 36, 3));
    }

    #[test]
    fn test_bucket_indices_are_row_major() {
        let buckets = generate_buckets(192, 128, 64);
        let origins: Vec<(u32, u32)> = buckets.iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (64, 0), (128, 0), (0, 64), (64, 64), (128, 64)]
        );
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let seeds: Vec<u32> = (0..16).map(|i| bucket_seed(42, i)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(bucket_seed(1, 0), bucket_seed(2, 0));
    }

    fn test_scene() -> Scene {
        let ground = Material::lambertian(Vec3::splat(0.5));
        let metal = Material::metal(Vec3::new(0.8, 0.6, 0.2), 0.3);
        let glass = Material::dielectric(1.5, 1.0);

        vec![
            Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground).unwrap(),
            Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, metal).unwrap(),
            Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_parallel_is_reproducible() {
        let scene = test_scene();
        let camera = CameraConfig::default().with_aspect_ratio(2.0).build().unwrap();
        let config = RenderConfig {
            width: 80,
            height: 40,
            samples_per_pixel: 2,
            max_depth: 10,
            ..RenderConfig::default()
        };

        let a = render_parallel(&camera, &scene, &config, 1234).unwrap();
        let b = render_parallel(&camera, &scene, &config, 1234).unwrap();
        assert_eq!(a.pixels, b.pixels);

        // Same result on a single worker thread
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let c = pool.install(|| render_parallel(&camera, &scene, &config, 1234).unwrap());
        assert_eq!(a.pixels, c.pixels);
    }

    #[test]
    fn test_render_parallel_matches_bucket_render() {
        let scene = test_scene();
        let camera = CameraConfig::default().with_aspect_ratio(2.0).build().unwrap();
        let config = RenderConfig {
            width: 70,
            height: 10,
            samples_per_pixel: 1,
            ..RenderConfig::default()
        };

        let image = render_parallel(&camera, &scene, &config, 9).unwrap();
        let buckets = generate_buckets(config.width, config.height, DEFAULT_BUCKET_SIZE);
        let second = render_bucket(&buckets[1], &camera, &scene, &config, 9);

        assert_eq!(second.bucket.x, 64);
        assert_eq!(second.pixels.len(), 6 * 10);
        assert_eq!(image.get(64, 0), second.pixels[0]);
        assert_eq!(image.get(69, 9), second.pixels[59]);
    }
}
