//! Point lights.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Color;

/// An infinitely small light source. Its contribution falls off as
/// `intensity / distance^2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    /// Carried with the light but not used by shading, which lights every
    /// surface with white
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    /// Create a white point light.
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color: Color::WHITE,
            intensity,
        }
    }
}
