//! Scene container and nearest-hit search.

use glam::Vec3;
use glint_math::Ray;

use crate::{Essence, Light};

/// Result of a scene intersection: the nearest essence and where it was hit.
#[derive(Debug, Clone, Copy)]
pub struct SceneIntersectResult<'a> {
    pub essence: &'a Essence,
    pub point: Vec3,
}

/// Essences and lights to be traced.
///
/// The scene is filled in before rendering starts and only read afterwards.
/// There is no spatial index; every query scans all essences.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    essences: Vec<Essence>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_essence(&mut self, essence: impl Into<Essence>) {
        self.essences.push(essence.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn essences(&self) -> &[Essence] {
        &self.essences
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn is_empty(&self) -> bool {
        self.essences.is_empty()
    }

    /// Find the essence nearest to the ray origin.
    ///
    /// Hits farther than `distance_max` are ignored, which is how shadow rays
    /// skip occluders behind the light. When two hits are equally close the
    /// one added to the scene first wins.
    pub fn intersect(&self, ray: &Ray, distance_max: Option<f32>) -> Option<SceneIntersectResult<'_>> {
        let mut nearest: Option<(f32, SceneIntersectResult<'_>)> = None;

        for essence in &self.essences {
            let Some(point) = essence.check_collision(ray) else {
                continue;
            };

            let distance = ray.origin.distance(point);
            if distance_max.is_some_and(|max| distance > max) {
                continue;
            }

            let closer = match &nearest {
                Some((best, _)) => distance < *best,
                None => true,
            };
            if closer {
                nearest = Some((distance, SceneIntersectResult { essence, point }));
            }
        }

        nearest.map(|(_, hit)| hit)
    }
}
