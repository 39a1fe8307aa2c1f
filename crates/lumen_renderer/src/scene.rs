//! Scene: an ordered list of hittable objects.

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Interval, Ray};

/// A list of hittable objects.
///
/// Queries scan every object and keep the closest hit. That is linear in
/// the object count, which is fine for scenes of a few hundred spheres.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add<H: Hittable + 'static>(&mut self, object: H) {
        self.objects.push(Box::new(object));
    }

    /// Clear all objects from the scene.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<H: Hittable + 'static> FromIterator<H> for Scene {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut scene = Scene::new();
        for object in iter {
            scene.add(object);
        }
        scene
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
