//! Demo scene: a 3x3 grid of spheres over a mirror floor, lit by three
//! white point lights.

use anyhow::Result;
use glam::Vec3;
use glint_renderer::{Light, Material, Quad, Scene, Sphere};
use rand::Rng;

pub fn build_scene<R: Rng + ?Sized>(rng: &mut R) -> Result<Scene> {
    let mut scene = Scene::new();

    for position in [
        Vec3::new(10.0, 10.0, 0.0),
        Vec3::new(-20.0, 5.0, -10.0),
        Vec3::new(-20.0, -20.0, -10.0),
    ] {
        scene.add_light(Light::new(position, 100.0));
    }

    for i in -1..=1 {
        for j in -1..=1 {
            let radius = if i == 0 && j == 0 { 0.75 } else { 0.5 };
            let center = Vec3::new(i as f32, j as f32, 4.0);
            scene.add_essence(Sphere::new(center, radius, Material::random(rng)));
        }
    }

    // Floor faces up, just below the bottom row
    let floor = Quad::square(Vec3::new(0.0, -1.6, 4.0), Vec3::Z, Vec3::X, 4.0, Material::mirror())?;
    scene.add_essence(floor);

    Ok(scene)
}
