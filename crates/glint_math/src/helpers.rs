//! Checked vector and matrix helpers.
//!
//! glam silently produces NaN when normalizing a zero vector and an
//! all-infinite matrix when inverting a singular one. These wrappers turn
//! both cases into errors for callers that cannot guarantee their input.

use crate::{Mat4, Vec3};
use thiserror::Error;

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Arithmetic failures in the math helpers.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,

    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
}

/// Normalize a vector, failing on zero (or non-finite) length.
pub fn normalize(v: Vec3) -> Result<Vec3, MathError> {
    v.try_normalize().ok_or(MathError::ZeroLength)
}

/// Mirror `v` about the normal `n`: v - 2 (v . n) n.
///
/// `n` must be unit length for the result to keep the length of `v`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - n * 2.0 * v.dot(n)
}

/// Invert a 4x4 matrix, failing when it is singular.
pub fn invert(m: Mat4) -> Result<Mat4, MathError> {
    if m.determinant().abs() < SINGULAR_EPSILON {
        return Err(MathError::SingularMatrix);
    }
    Ok(m.inverse())
}
