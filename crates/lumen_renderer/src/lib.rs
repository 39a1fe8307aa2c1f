//! Lumen - CPU path tracing of sphere scenes.
//!
//! A Monte Carlo path tracer: camera rays are jittered per pixel, bounced
//! off spheres according to their materials, and averaged into a color.
//!
//! Every random draw goes through an explicitly passed generator, so a
//! render is reproducible from its seed.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
mod random;
mod renderer;
mod scene;
mod sphere;

pub use bucket::{
    bucket_seed, generate_buckets, render_bucket, render_parallel, Bucket, BucketResult,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, CameraConfig};
pub use error::{RenderError, Result};
pub use hittable::{HitRecord, Hittable};
pub use material::{Color, Material, ScatterResult};
pub use random::{gen_f32, gen_f64, random_in_unit_sphere, random_on_unit_sphere, XorShift};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, ImageBuffer,
    RenderConfig,
};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3};
