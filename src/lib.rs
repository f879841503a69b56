//! Exhaustive cosine-similarity top-k search over dense embeddings.
//!
//! `semsearch` is the scoring core of a semantic-search pipeline. Given a
//! matrix of query embeddings and a matrix of corpus embeddings, it returns the
//! `k` most similar corpus items for every query:
//!
//! - **Vector math**: [`dot`], [`norm`], [`cosine`]
//! - **Similarity blocks**: [`cos_sim`], [`dot_score`] over [`MatrixView`]s
//! - **Bounded selection**: [`TopK`]
//! - **Search**: [`semantic_search`], [`search`], `par_semantic_search` (feature `parallel`)
//!
//! # Chunking
//!
//! Queries and corpus are scored in rectangular blocks of
//! `query_chunk_size × corpus_chunk_size`, and each query keeps a running
//! [`TopK`] across blocks. The full `queries × corpus` score matrix is never
//! materialized. Chunk sizes are a memory/speed knob only: output is identical
//! for every chunking, including how equal scores are ordered (lower corpus id
//! first).
//!
//! # SIMD Dispatch
//!
//! | Architecture | Instructions | Detection |
//! |--------------|--------------|-----------|
//! | x86_64 | AVX2 + FMA | Runtime |
//! | aarch64 | NEON | Always available |
//! | Other | Portable | LLVM auto-vectorizes |
//!
//! Vectors shorter than [`MIN_DIM_SIMD`] dimensions use portable code.
//!
//! # Example
//!
//! ```rust
//! use semsearch::{semantic_search, Matrix, SearchConfig};
//!
//! let queries = Matrix::from_rows(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])?;
//! let corpus = Matrix::from_rows(&[
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.0, 0.0, 1.0],
//! ])?;
//!
//! let config = SearchConfig::new(2)
//!     .with_query_chunk_size(1)
//!     .with_corpus_chunk_size(2);
//! let hits = semantic_search(&queries, &corpus, &config)?;
//!
//! assert_eq!(hits.len(), 2);
//! assert_eq!((hits[0][0].corpus_id, hits[0][0].score), (0, 1.0));
//! assert_eq!((hits[0][1].corpus_id, hits[0][1].score), (1, 0.0));
//! # Ok::<(), semsearch::Error>(())
//! ```
//!
//! # Degenerate vectors
//!
//! Cosine similarity with a zero-norm vector is NaN. Such scores are kept,
//! not rejected, and rank below every real score.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arch;
mod dense;
pub mod error;
pub mod matrix;
pub mod search;
pub mod similarity;
pub mod topk;

pub use dense::{checked_dot, cosine, dot, dot_portable, norm};
pub use error::{Error, Result};
pub use matrix::{Matrix, MatrixView};
#[cfg(feature = "parallel")]
pub use search::par_semantic_search;
pub use search::{
    search, semantic_search, SearchConfig, DEFAULT_CORPUS_CHUNK_SIZE, DEFAULT_QUERY_CHUNK_SIZE,
    DEFAULT_TOP_K,
};
pub use similarity::{cos_sim, dot_score, ScoreFunction, SimilarityBlock};
pub use topk::{SearchResult, TopK};

/// Minimum vector dimension for the SIMD dot product kernels.
///
/// Below this, call and reduction overhead outweighs the vector width.
pub const MIN_DIM_SIMD: usize = 16;
