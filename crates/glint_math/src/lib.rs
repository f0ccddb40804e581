// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod helpers;
mod ray;
pub use helpers::{invert, normalize, reflect, MathError};
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
