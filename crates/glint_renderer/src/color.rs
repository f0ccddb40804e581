//! RGBA color with saturating arithmetic.
//!
//! Addition and scaling clamp every channel to at most 1.0. There is no
//! lower clamp, so negative inputs pass straight through.

use std::ops::{Add, Mul};

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A color with channels conceptually in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create an opaque color.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// A random opaque color with every channel uniform in [0.2, 1.0).
    ///
    /// The lower bound keeps randomized materials from coming out near black.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(0.2..1.0),
            rng.gen_range(0.2..1.0),
            rng.gen_range(0.2..1.0),
        )
    }

    /// Build a color from an RGB vector without clamping.
    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// RGB channels as a vector, for accumulation.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::with_alpha(
            (self.r + rhs.r).min(1.0),
            (self.g + rhs.g).min(1.0),
            (self.b + rhs.b).min(1.0),
            self.a,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, value: f32) -> Color {
        Color::with_alpha(
            (self.r * value).min(1.0),
            (self.g * value).min(1.0),
            (self.b * value).min(1.0),
            self.a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_add_clamps_above() {
        let a = Color::new(0.8, 0.5, 0.1);
        let b = Color::new(0.7, 0.2, 0.1);
        let c = a + b;
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.7).abs() < 1e-6);
        assert!((c.b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_scale_clamps_above() {
        let c = Color::new(0.5, 0.25, 0.0) * 3.0;
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.75);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_no_lower_clamp() {
        let c = Color::new(0.5, 0.5, 0.5) * -1.0;
        assert_eq!(c.r, -0.5);
    }

    #[test]
    fn test_clamp_law_over_many_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let a = Color::new(rng.gen_range(0.0..2.0), rng.gen_range(0.0..2.0), rng.gen_range(0.0..2.0));
            let b = Color::new(rng.gen_range(0.0..2.0), rng.gen_range(0.0..2.0), rng.gen_range(0.0..2.0));
            let s: f32 = rng.gen_range(0.0..10.0);
            for c in [a + b, a * s] {
                assert!(c.r <= 1.0 && c.g <= 1.0 && c.b <= 1.0);
            }
        }
    }

    #[test]
    fn test_random_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let c = Color::random(&mut rng);
            for channel in [c.r, c.g, c.b] {
                assert!((0.2..1.0).contains(&channel));
            }
            assert_eq!(c.a, 1.0);
        }
    }
}
