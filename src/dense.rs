//! Dense vector math: dot product, L2 norm, cosine similarity.
//!
//! | ISA | Min dim | Kernel |
//! |-----|---------|--------|
//! | AVX2+FMA | 16 | `arch::x86_64::dot_avx2` (runtime detection) |
//! | NEON | 16 | `arch::aarch64::dot_neon` (always available) |
//! | Portable | any | [`dot_portable`] |

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use crate::arch;
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use crate::MIN_DIM_SIMD;
use crate::{Error, Result};

/// Dot product of two vectors: `Σ(a[i] * b[i])`.
///
/// Returns 0.0 for empty vectors.
///
/// # Debug Assertions
///
/// In debug builds, panics if vector lengths differ. In release builds,
/// mismatched lengths silently use the shorter length. Use [`checked_dot`]
/// when the lengths have not been validated already.
///
/// # Example
///
/// ```rust
/// use semsearch::dot;
///
/// assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
/// ```
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(
        a.len(),
        b.len(),
        "dot: dimension mismatch ({} vs {})",
        a.len(),
        b.len()
    );

    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    let n = a.len().min(b.len());

    #[cfg(target_arch = "x86_64")]
    {
        if n >= MIN_DIM_SIMD && is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
        {
            // SAFETY: AVX2 and FMA verified via runtime detection.
            return unsafe { arch::x86_64::dot_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if n >= MIN_DIM_SIMD {
            // SAFETY: NEON is always available on aarch64.
            return unsafe { arch::aarch64::dot_neon(a, b) };
        }
    }

    dot_portable(a, b)
}

/// Portable (non-SIMD) dot product.
#[inline]
#[must_use]
pub fn dot_portable(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Dot product that rejects mismatched lengths instead of asserting.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if `a.len() != b.len()`.
///
/// ```rust
/// use semsearch::{checked_dot, Error};
///
/// assert_eq!(checked_dot(&[1.0, 2.0], &[3.0, 4.0]), Ok(11.0));
/// assert_eq!(
///     checked_dot(&[1.0, 2.0], &[3.0]),
///     Err(Error::DimensionMismatch { expected: 2, found: 1 })
/// );
/// ```
pub fn checked_dot(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(dot(a, b))
}

/// L2 norm (Euclidean norm) of a vector: `sqrt(Σ(v[i]²))`.
///
/// Returns 0.0 for the all-zero vector.
#[inline]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Cosine similarity: `dot(a, b) / (norm(a) * norm(b))`.
///
/// # Zero Vector Handling
///
/// No epsilon guard. If either vector has zero norm the result is NaN
/// (`0 / 0`). Search ranks NaN below every real score, see [`crate::TopK`].
///
/// # Example
///
/// ```rust
/// use semsearch::cosine;
///
/// assert!(cosine(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).abs() < 1e-6);
/// assert!((cosine(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
/// assert!(cosine(&[1.0, 2.0], &[0.0, 0.0]).is_nan());
/// ```
#[inline]
#[must_use]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    dot(a, b) / (norm(a) * norm(b))
}
