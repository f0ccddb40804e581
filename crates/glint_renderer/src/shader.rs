//! Recursive Whitted shading.
//!
//! Each hit is lit by every visible point light (Lambert diffuse plus a
//! Phong highlight) and, for reflective materials, by a recursively traced
//! mirror ray. There is no ambient term, no refraction and no randomness:
//! a given ray always produces the same color.

use glam::Vec3;
use glint_math::{reflect, Ray};

use crate::{Color, Essence, Scene};

/// Light gathered at a surface point before material weights are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectLight {
    pub diffuse: f32,
    pub specular: f32,
}

/// Shading parameters shared by every ray of a render.
#[derive(Debug, Clone, Copy)]
pub struct Shader {
    /// Returned for rays that escape the scene or exceed `max_depth`
    pub background: Color,
    /// Deepest reflection bounce that is still shaded
    pub max_depth: u32,
    /// Offset applied to secondary ray origins to avoid self-intersection
    pub epsilon: f32,
}

impl Default for Shader {
    fn default() -> Self {
        Self {
            background: Color::new(0.0, 0.6, 0.9),
            max_depth: 5,
            epsilon: 1e-3,
        }
    }
}

impl Shader {
    /// Compute the color seen along a ray. Primary rays start at depth 0.
    pub fn cast_ray(&self, scene: &Scene, ray: &Ray, depth: u32) -> Color {
        if depth > self.max_depth {
            return self.background;
        }

        let Some(hit) = scene.intersect(ray, None) else {
            return self.background;
        };

        let normal = hit.essence.normal(hit.point);
        let material = hit.essence.material();
        let light = self.direct_light(scene, ray, hit.essence, hit.point, normal);

        let mut color = material.color * light.diffuse * material.diffuse_component
            + Color::WHITE * light.specular * material.specular_component;

        if material.reflect_component > 0.0 {
            let reflected = self.reflected_ray(ray, hit.point, normal);
            color = color + self.cast_ray(scene, &reflected, depth + 1) * material.reflect_component;
        }

        color
    }

    /// Sum diffuse and specular intensity from every light that is not
    /// occluded as seen from `point`.
    pub fn direct_light(
        &self,
        scene: &Scene,
        ray: &Ray,
        essence: &Essence,
        point: Vec3,
        normal: Vec3,
    ) -> DirectLight {
        let shininess = essence.material().specular;
        let mut total = DirectLight::default();

        for light in scene.lights() {
            let to_light = light.position - point;
            let distance = to_light.length();
            if distance <= 0.0 {
                continue;
            }
            let direction = to_light / distance;
            let facing = direction.dot(normal);

            // Start on whichever side of the surface faces the light
            let origin = point + normal * self.epsilon * facing.signum();
            let shadow_ray = Ray::with_length(origin, direction, distance);
            if scene.intersect(&shadow_ray, Some(distance)).is_some() {
                continue;
            }

            total.diffuse += light.intensity / (distance * distance) * facing.max(0.0);

            let highlight = -reflect(-direction, normal).dot(ray.direction);
            total.specular += highlight.max(0.0).powf(shininess) * light.intensity;
        }

        total
    }

    /// Mirror the incoming ray about the normal, nudging the origin off the
    /// surface on the side the reflection leaves from.
    fn reflected_ray(&self, ray: &Ray, point: Vec3, normal: Vec3) -> Ray {
        let direction = reflect(ray.direction, normal).normalize();
        let side = direction.dot(normal).signum();
        Ray::new(point + normal * self.epsilon * side, direction)
    }
}
