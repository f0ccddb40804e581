//! Surface materials for Whitted shading.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Color;

/// How a surface responds to direct light and reflection.
///
/// The component weights scale the diffuse, specular and reflected terms
/// of the final color. They are not required to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color, used by the diffuse term
    pub color: Color,
    pub diffuse_component: f32,
    pub specular_component: f32,
    pub reflect_component: f32,
    /// Phong shininess exponent
    pub specular: f32,
}

impl Material {
    /// A matte-ish material with a soft highlight and no reflection.
    pub fn matte(color: Color) -> Self {
        Self {
            color,
            diffuse_component: 1.0,
            specular_component: 0.3,
            reflect_component: 0.0,
            specular: 50.0,
        }
    }

    /// The default preset with a randomized base color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::matte(Color::random(rng))
    }

    /// A mostly reflective surface with a tight highlight.
    pub fn mirror() -> Self {
        Self {
            color: Color::WHITE,
            diffuse_component: 0.1,
            specular_component: 0.8,
            reflect_component: 0.8,
            specular: 1000.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::matte(Color::new(0.5, 0.5, 0.5))
    }
}
