use crate::Vec3;

/// A ray in 3D space with origin, direction and an optional length.
///
/// The direction is expected to be unit length. Nothing enforces that here,
/// so callers normalize explicitly before building a ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: Option<f32>,
}

impl Ray {
    /// Create a new unbounded ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            length: None,
        }
    }

    /// Create a ray that carries a length. Intersection code ignores it.
    pub fn with_length(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction,
            length: Some(length),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
