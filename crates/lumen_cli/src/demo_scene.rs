//! The demo scene: a field of small random spheres around three large ones.

use lumen_renderer::{Color, Material, Result, Scene, Sphere, Vec3, XorShift};

/// Half-width of the grid of small spheres.
const GRID_SIZE: i32 = 5;

/// Build the demo spheres, drawing every random choice from `rng`.
pub fn demo_spheres(rng: &mut XorShift) -> Result<Vec<Sphere>> {
    let mut spheres = vec![Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian(Color::new(0.5, 0.5, 0.5)),
    )?];

    for a in -GRID_SIZE..GRID_SIZE {
        for b in -GRID_SIZE..GRID_SIZE {
            let choose_mat = rng.next_f32();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.next_f32(),
                0.2,
                b as f32 + 0.9 * rng.next_f32(),
            );

            // Keep clear of the metal sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                // Diffuse
                Material::lambertian(Color::new(
                    rng.next_f32() * rng.next_f32(),
                    rng.next_f32() * rng.next_f32(),
                    rng.next_f32() * rng.next_f32(),
                ))
            } else if choose_mat < 0.95 {
                // Metal
                Material::metal(
                    Color::new(
                        0.5 * (1.0 + rng.next_f32()),
                        0.5 * (1.0 + rng.next_f32()),
                        0.5 * (1.0 + rng.next_f32()),
                    ),
                    0.5 * rng.next_f32(),
                )
            } else {
                // Glass
                Material::dielectric(1.5, 1.0)
            };

            spheres.push(Sphere::new(center, 0.2, material)?);
        }
    }

    spheres.push(Sphere::new(Vec3::new(0.0, 1.0, 1.0), 1.0, Material::dielectric(1.5, 1.0))?);
    spheres.push(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Color::new(0.4, 0.2, 0.1)),
    )?);
    spheres.push(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    )?);

    Ok(spheres)
}

/// Build the demo scene.
pub fn build_demo_scene(rng: &mut XorShift) -> Result<Scene> {
    Ok(demo_spheres(rng)?.into_iter().collect())
}
