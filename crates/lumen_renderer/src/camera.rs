//! Thin-lens camera for ray generation.

use crate::error::{RenderError, Result};
use crate::random::random_in_unit_sphere;
use lumen_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Camera placement and lens settings.
///
/// Use the `with_*` methods to adjust it, then [`CameraConfig::build`] to
/// derive the immutable [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Image width over image height
    pub aspect_ratio: f32,
    /// Lens diameter; 0.0 is a pinhole
    pub aperture: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 2.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

impl CameraConfig {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Derive the camera basis and image plane.
    ///
    /// Fails when the view has no direction, `vup` is parallel to it, or the
    /// lens settings cannot form an image plane.
    pub fn build(&self) -> Result<Camera> {
        let view = self.look_from - self.look_at;
        if !view.is_finite() || view.length_squared() == 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "camera looks from {} at the same point",
                self.look_from
            )));
        }
        let side = self.vup.cross(view);
        if !side.is_finite() || side.length_squared() <= 1e-12 * view.length_squared() {
            return Err(RenderError::InvalidConfig(format!(
                "vup {} is parallel to the view direction",
                self.vup
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "vfov must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }
        if !(self.focus_dist > 0.0 && self.aspect_ratio > 0.0 && self.aperture >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "invalid lens: focus_dist {}, aspect_ratio {}, aperture {}",
                self.focus_dist, self.aspect_ratio, self.aperture
            )));
        }

        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect_ratio * half_height;

        let w = view.normalize();
        let u = side.normalize();
        let v = w.cross(u);

        let origin = self.look_from;
        let focus = self.focus_dist;

        Ok(Camera {
            origin,
            lower_left_corner: origin
                - half_width * focus * u
                - half_height * focus * v
                - focus * w,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Generate a ray through normalized image-plane coordinates.
    ///
    /// `s` runs left to right and `t` bottom to top, both in [0, 1]. The ray
    /// origin is jittered across the lens for depth of field.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_sphere(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Camera basis: `u` right, `v` up, `w` pointing back from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
