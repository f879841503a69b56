//! Architecture-specific dot product kernels.
//!
//! Everything in here is `unsafe` and assumes the caller has checked CPU
//! support. [`crate::dot`] owns dispatch and the portable fallback.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
