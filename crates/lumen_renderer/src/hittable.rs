//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Only produced for an actual hit; a miss is `None` at the call site.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Outward surface normal at the intersection, unit length
    pub normal: Vec3,
    /// Material of the object that was hit
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray arrived from outside the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record from a ray parameter and an outward unit normal.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: ray.direction().dot(outward_normal) < 0.0,
        }
    }

    /// Normal flipped, if needed, to point against the incoming ray.
    #[inline]
    pub fn facing_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_front_face_from_outside() {
        let mat = Material::lambertian(Color::splat(0.5));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, &mat);

        assert!(rec.front_face);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(rec.facing_normal(), Vec3::Z);
    }

    #[test]
    fn test_back_face_from_inside() {
        let mat = Material::lambertian(Color::splat(0.5));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::NEG_Z, &mat);

        // Stored normal stays outward, facing normal opposes the ray
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Z);
        assert_eq!(rec.facing_normal(), Vec3::Z);
    }
}
