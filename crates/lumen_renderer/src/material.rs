//! Surface scattering models.

use crate::hittable::HitRecord;
use crate::random::{gen_f32, random_in_unit_sphere};
use lumen_math::{reflect, refract, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel factor applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The bounced ray
    pub scattered: Ray,
}

/// Materials describe how light interacts with surfaces.
///
/// Materials are plain values with no per-call state, so a single material
/// can be shared by any number of objects and threads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    /// Diffuse surface.
    Lambertian { albedo: Color },
    /// Specular reflector. `fuzz` is 0.0 for a perfect mirror, 1.0 for very rough.
    Metal { albedo: Color, fuzz: f32 },
    /// Glass-like refractor.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
        refraction_index: f32,
        attenuation: Color,
    },
}

impl Material {
    /// Create a new Lambertian material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a new Metal material. `fuzz` is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a new Dielectric material with a grey attenuation.
    pub fn dielectric(refraction_index: f32, attenuation: f32) -> Self {
        Material::Dielectric {
            refraction_index,
            attenuation: Color::splat(attenuation),
        }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `Some` with the attenuation and scattered ray, or `None` if
    /// the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Lambertian { albedo } => scatter_lambertian(albedo, rec, rng),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, ray_in, rec, rng),
            Material::Dielectric {
                refraction_index,
                attenuation,
            } => scatter_dielectric(refraction_index, attenuation, ray_in, rec, rng),
        }
    }
}

fn scatter_lambertian(
    albedo: Color,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

    // Catch degenerate scatter direction
    if scatter_direction.length_squared() < 1e-8 {
        scatter_direction = rec.normal;
    }

    Some(ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(rec.p, scatter_direction),
    })
}

fn scatter_metal(
    albedo: Color,
    fuzz: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let reflected = reflect(ray_in.direction().normalize(), rec.normal);
    let scattered_dir = reflected + fuzz * random_in_unit_sphere(rng);

    // A direction into the surface is absorbed
    if scattered_dir.dot(rec.normal) > 0.0 {
        Some(ScatterResult {
            attenuation: albedo,
            scattered: Ray::new(rec.p, scattered_dir),
        })
    } else {
        None
    }
}

fn scatter_dielectric(
    refraction_index: f32,
    attenuation: Color,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let refraction_ratio = if rec.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };
    let normal = rec.facing_normal();

    let unit_direction = ray_in.direction().normalize();
    let cos_theta = (-unit_direction).dot(normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    // Total internal reflection
    let cannot_refract = refraction_ratio * sin_theta > 1.0;

    let direction =
        if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
            reflect(unit_direction, normal)
        } else {
            refract(unit_direction, normal, refraction_ratio)
        };

    Some(ScatterResult {
        attenuation,
        scattered: Ray::new(rec.p, direction),
    })
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XorShift;

    fn record<'a>(material: &'a Material, p: Vec3, normal: Vec3, ray: &Ray) -> HitRecord<'a> {
        HitRecord {
            p,
            normal,
            material,
            t: 1.0,
            front_face: ray.direction().dot(normal) < 0.0,
        }
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let rough = Material::metal(Color::ONE, 3.0);
        assert_eq!(rough, Material::Metal { albedo: Color::ONE, fuzz: 1.0 });

        let mirror = Material::metal(Color::ONE, -1.0);
        assert_eq!(mirror, Material::Metal { albedo: Color::ONE, fuzz: 0.0 });
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let albedo = Color::new(0.8, 0.3, 0.3);
        let mat = Material::lambertian(albedo);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        let mut rng = XorShift::new(11);

        for _ in 0..1_000 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("lambertian never absorbs");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            // normal + point in unit sphere stays in the normal's hemisphere
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Material::metal(Color::splat(0.9), 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        let mut rng = XorShift::new(3);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("mirror should reflect");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-6);
        assert_eq!(result.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_metal_grazing_incidence_is_absorbed() {
        let mat = Material::metal(Color::splat(0.9), 0.0);
        // Direction lies in the tangent plane: reflection has zero normal component
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X);
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        let mut rng = XorShift::new(3);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_from_behind_is_absorbed() {
        let mat = Material::metal(Color::splat(0.9), 0.0);
        // Ray travelling along the outward normal reflects into the surface
        let ray = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        let mut rng = XorShift::new(3);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_fuzzy_metal_near_grazing_absorbs_some() {
        let mat = Material::metal(Color::ONE, 1.0);
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        let mut rng = XorShift::new(21);

        let mut absorbed = 0;
        for _ in 0..1_000 {
            match mat.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_normal_incidence_transmits() {
        let mat = Material::dielectric(1.5, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        let mut rng = XorShift::new(5);

        // Reflectance at normal incidence is 4%, so most samples pass straight through
        let mut transmitted = 0;
        for _ in 0..1_000 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("dielectric never absorbs");
            assert_eq!(result.attenuation, Color::ONE);
            if (result.scattered.direction() - Vec3::NEG_Y).length() < 1e-5 {
                transmitted += 1;
            }
        }
        assert!(transmitted > 900, "transmitted {} of 1000", transmitted);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Material::dielectric(1.5, 1.0);
        // Leaving glass at a shallow angle: outward normal +Y, ray heading out
        let dir = Vec3::new(1.0, 0.2, 0.0).normalize();
        let ray = Ray::new(Vec3::new(-1.0, -0.2, 0.0), dir);
        let rec = record(&mat, Vec3::ZERO, Vec3::Y, &ray);
        assert!(!rec.front_face);
        let mut rng = XorShift::new(9);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = reflect(dir, Vec3::NEG_Y);
            assert!((result.scattered.direction() - expected).length() < 1e-6);
            assert!(result.scattered.direction().y < 0.0);
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        // Normal incidence into glass: ((1 - 1.5) / (1 + 1.5))^2 = 0.04
        assert!((reflectance(1.0, 1.5) - 0.04).abs() < 1e-6);
        // Grazing incidence reflects everything
        assert!((reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }
}
