//! NEON kernels for aarch64.
//!
//! NEON is part of the aarch64 baseline, so no runtime detection is needed.

use std::arch::aarch64::{vaddq_f32, vaddvq_f32, vdupq_n_f32, vfmaq_f32, vld1q_f32};

/// NEON dot product, two accumulators (8 floats per iteration).
///
/// Uses `min(a.len(), b.len())` elements.
///
/// # Safety
///
/// Always sound on aarch64; `unsafe` only because of the raw-pointer loads.
#[target_feature(enable = "neon")]
pub unsafe fn dot_neon(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let mut acc0 = vdupq_n_f32(0.0);
    let mut acc1 = vdupq_n_f32(0.0);

    let blocks = n / 8;
    for i in 0..blocks {
        let base = i * 8;
        acc0 = vfmaq_f32(acc0, vld1q_f32(a_ptr.add(base)), vld1q_f32(b_ptr.add(base)));
        acc1 = vfmaq_f32(
            acc1,
            vld1q_f32(a_ptr.add(base + 4)),
            vld1q_f32(b_ptr.add(base + 4)),
        );
    }

    let mut sum = vaddvq_f32(vaddq_f32(acc0, acc1));
    for i in blocks * 8..n {
        sum += *a.get_unchecked(i) * *b.get_unchecked(i);
    }
    sum
}
