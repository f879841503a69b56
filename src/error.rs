//! Error types for semsearch.
//!
//! All errors are input validation failures raised before any scoring work
//! starts. There is nothing transient here, so nothing is retried and no
//! partial results are ever returned.

use thiserror::Error;

/// Errors returned by matrix construction and search entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Vectors within a matrix, or across the query and corpus matrices,
    /// have inconsistent lengths.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality established by the first vector seen.
        expected: usize,
        /// Offending dimensionality.
        found: usize,
    },
    /// A chunk size or `top_k` is zero.
    #[error("invalid parameter `{name}`: {value} (must be >= 1)")]
    InvalidParameter {
        /// Parameter name as it appears in [`SearchConfig`](crate::SearchConfig).
        name: &'static str,
        /// Rejected value.
        value: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
