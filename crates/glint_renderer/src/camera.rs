//! Fixed pinhole camera for primary ray generation.

use glam::Vec3;
use glint_math::Ray;
use rand::Rng;

/// A pinhole at the origin looking down +Z, with +Y up on screen.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    /// Distance of the image plane, in pixels
    focal: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32, fov_degrees: f32) -> Self {
        let half_fov = fov_degrees.to_radians() / 2.0;
        Self {
            width,
            height,
            focal: width as f32 / half_fov.tan(),
        }
    }

    /// Ray through pixel `(x, y)` at sub-pixel offset `(offset_x, offset_y)`,
    /// both offsets in [0, 1).
    pub fn ray_through(&self, x: u32, y: u32, offset_x: f32, offset_y: f32) -> Ray {
        let half_width = self.width as f32 / 2.0;
        let half_height = self.height as f32 / 2.0;
        let direction = Vec3::new(
            x as f32 + offset_x - half_width,
            -(y as f32 + offset_y) + half_height,
            self.focal,
        );
        Ray::new(Vec3::ZERO, direction.normalize())
    }

    /// Ray through pixel `(x, y)` with a uniformly jittered sub-pixel offset.
    pub fn get_ray<R: Rng + ?Sized>(&self, x: u32, y: u32, rng: &mut R) -> Ray {
        self.ray_through(x, y, rng.gen(), rng.gen())
    }
}
