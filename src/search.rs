//! Chunked exhaustive top-k search.
//!
//! # Algorithm
//!
//! ```text
//! for each query chunk (query_chunk_size rows):
//!     one TopK per query in the chunk
//!     for each corpus chunk (corpus_chunk_size rows), ascending ids:
//!         block = score(query chunk, corpus chunk)       // Q x C scores
//!         fold block row i into TopK i
//!     finalize each TopK into a ranked list
//! ```
//!
//! Only one `query_chunk_size × corpus_chunk_size` block is alive at a time,
//! so peak memory is independent of the corpus size. Chunk sizes change
//! performance only: every query's result is the same for any chunking,
//! ties included (see [`crate::topk`] for the rank order).

use tracing::{debug, instrument, trace};

use crate::matrix::{Matrix, MatrixView};
use crate::similarity::ScoreFunction;
use crate::topk::{SearchResult, TopK};
use crate::{Error, Result};

/// Default number of queries scored per block.
pub const DEFAULT_QUERY_CHUNK_SIZE: usize = 100;

/// Default number of corpus vectors scored per block.
pub const DEFAULT_CORPUS_CHUNK_SIZE: usize = 500_000;

/// Default number of hits returned per query.
pub const DEFAULT_TOP_K: usize = 10;

/// Tuning and ranking parameters for one search call.
///
/// ```rust
/// use semsearch::{ScoreFunction, SearchConfig};
///
/// let config = SearchConfig::new(5)
///     .with_query_chunk_size(32)
///     .with_corpus_chunk_size(10_000)
///     .with_score_function(ScoreFunction::DotProduct);
/// assert!(config.validate().is_ok());
/// assert!(SearchConfig::new(0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Queries per block. Must be >= 1.
    pub query_chunk_size: usize,
    /// Corpus vectors per block. Must be >= 1.
    pub corpus_chunk_size: usize,
    /// Hits kept per query. Must be >= 1; may exceed the corpus size.
    pub top_k: usize,
    /// How each pair is scored.
    pub score_function: ScoreFunction,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query_chunk_size: DEFAULT_QUERY_CHUNK_SIZE,
            corpus_chunk_size: DEFAULT_CORPUS_CHUNK_SIZE,
            top_k: DEFAULT_TOP_K,
            score_function: ScoreFunction::Cosine,
        }
    }
}

impl SearchConfig {
    /// Default chunking, cosine scoring, `top_k` hits.
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            ..Self::default()
        }
    }

    /// Set queries per block.
    #[must_use]
    pub fn with_query_chunk_size(mut self, size: usize) -> Self {
        self.query_chunk_size = size;
        self
    }

    /// Set corpus vectors per block.
    #[must_use]
    pub fn with_corpus_chunk_size(mut self, size: usize) -> Self {
        self.corpus_chunk_size = size;
        self
    }

    /// Set hits kept per query.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the score function.
    #[must_use]
    pub fn with_score_function(mut self, score_function: ScoreFunction) -> Self {
        self.score_function = score_function;
        self
    }

    /// Reject zero chunk sizes and a zero `top_k`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("query_chunk_size", self.query_chunk_size),
            ("corpus_chunk_size", self.corpus_chunk_size),
            ("top_k", self.top_k),
        ] {
            if value == 0 {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

fn check_pair(queries: &Matrix, corpus: &Matrix) -> Result<()> {
    if !queries.is_empty() && !corpus.is_empty() && queries.dim() != corpus.dim() {
        return Err(Error::DimensionMismatch {
            expected: queries.dim(),
            found: corpus.dim(),
        });
    }
    Ok(())
}

fn num_chunks(rows: usize, chunk_size: usize) -> usize {
    rows.div_ceil(chunk_size)
}

/// One `TopK` per query, sized for at most `candidates` corpus hits.
fn empty_sets(rows: usize, top_k: usize, candidates: usize) -> Vec<TopK> {
    (0..rows)
        .map(|_| TopK::with_expected(top_k, candidates))
        .collect()
}

/// Score one block and fold row `i` into `sets[i]`.
fn fold_block(
    sets: &mut [TopK],
    query_chunk: MatrixView<'_>,
    corpus_chunk: MatrixView<'_>,
    score_function: ScoreFunction,
) -> Result<()> {
    let block = score_function.score_block(query_chunk, corpus_chunk)?;
    trace!(
        query_offset = block.query_offset(),
        corpus_offset = block.corpus_offset(),
        rows = block.num_queries(),
        cols = block.num_corpus(),
        "scored block"
    );
    for (i, set) in sets.iter_mut().enumerate() {
        set.extend(block.scored_row(i));
    }
    Ok(())
}

fn rank_query_chunk(
    query_chunk: MatrixView<'_>,
    corpus: &Matrix,
    config: &SearchConfig,
) -> Result<Vec<Vec<SearchResult>>> {
    let mut sets = empty_sets(query_chunk.rows(), config.top_k, corpus.rows());
    for corpus_chunk in corpus.chunks(config.corpus_chunk_size) {
        fold_block(&mut sets, query_chunk, corpus_chunk, config.score_function)?;
    }
    Ok(sets.into_iter().map(TopK::into_sorted_vec).collect())
}

/// Top-k corpus hits for every query.
///
/// Returns one list per query, in query order. Each list holds
/// `min(top_k, corpus.rows())` hits, best first, equal scores by ascending
/// corpus id. Degenerate (NaN) scores come after every real score.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `config` fails [`SearchConfig::validate`].
/// - [`Error::DimensionMismatch`] if queries and corpus disagree on dimensionality.
///
/// Both are checked before any scoring; no partial results are returned.
///
/// # Example
///
/// ```rust
/// use semsearch::{semantic_search, Matrix, SearchConfig};
///
/// let queries = Matrix::from_rows(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]).unwrap();
/// let corpus = Matrix::from_rows(&[
///     vec![1.0, 0.0, 0.0],
///     vec![0.0, 1.0, 0.0],
///     vec![0.0, 0.0, 1.0],
/// ])
/// .unwrap();
/// let config = SearchConfig::new(2)
///     .with_query_chunk_size(1)
///     .with_corpus_chunk_size(2);
///
/// let hits = semantic_search(&queries, &corpus, &config).unwrap();
/// assert_eq!(hits[0][0].corpus_id, 0);
/// assert_eq!(hits[0][1].corpus_id, 1); // ties corpus 2 at 0.0, lower id wins
/// assert_eq!(hits[1][0].corpus_id, 1);
/// assert_eq!(hits[1][1].corpus_id, 0);
/// ```
#[instrument(
    skip_all,
    fields(
        num_queries = queries.rows(),
        num_corpus = corpus.rows(),
        dim = queries.dim(),
        top_k = config.top_k
    )
)]
pub fn semantic_search(
    queries: &Matrix,
    corpus: &Matrix,
    config: &SearchConfig,
) -> Result<Vec<Vec<SearchResult>>> {
    config.validate()?;
    check_pair(queries, corpus)?;

    debug!(
        query_chunks = num_chunks(queries.rows(), config.query_chunk_size),
        corpus_chunks = num_chunks(corpus.rows(), config.corpus_chunk_size),
        score_function = ?config.score_function,
        "starting chunked search"
    );

    let mut results = Vec::with_capacity(queries.rows());
    for query_chunk in queries.chunks(config.query_chunk_size) {
        results.extend(rank_query_chunk(query_chunk, corpus, config)?);
    }
    Ok(results)
}

/// [`semantic_search`] over plain row vectors with cosine scoring.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if any size parameter is zero (checked first).
/// - [`Error::DimensionMismatch`] if any vector's length differs from the rest.
///
/// # Example
///
/// ```rust
/// use semsearch::search;
///
/// let queries: Vec<Vec<f32>> = vec![vec![1.0, 0.0, 0.0]];
/// let corpus: Vec<Vec<f32>> = vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 0.0], vec![1.0, 1.0, 0.0]];
///
/// let hits = search(&queries, &corpus, 1, 2, 10).unwrap();
/// let ids: Vec<usize> = hits[0].iter().map(|h| h.corpus_id).collect();
/// assert_eq!(ids, vec![1, 2, 0]);
/// ```
pub fn search(
    query_embeddings: &[Vec<f32>],
    corpus_embeddings: &[Vec<f32>],
    query_chunk_size: usize,
    corpus_chunk_size: usize,
    top_k: usize,
) -> Result<Vec<Vec<SearchResult>>> {
    let config = SearchConfig::new(top_k)
        .with_query_chunk_size(query_chunk_size)
        .with_corpus_chunk_size(corpus_chunk_size);
    config.validate()?;

    let queries = Matrix::from_rows(query_embeddings)?;
    let corpus = Matrix::from_rows(corpus_embeddings)?;
    semantic_search(&queries, &corpus, &config)
}

/// Parallel [`semantic_search`] on the rayon thread pool.
///
/// Query chunks run on separate workers. Within a query chunk, corpus chunks
/// are also scored concurrently into per-chunk [`TopK`] sets that are then
/// merged. The rank order does not depend on arrival order, so the output is
/// identical to the sequential search for any chunking.
///
/// # Errors
///
/// Same as [`semantic_search`].
#[cfg(feature = "parallel")]
#[instrument(
    skip_all,
    fields(
        num_queries = queries.rows(),
        num_corpus = corpus.rows(),
        dim = queries.dim(),
        top_k = config.top_k
    )
)]
pub fn par_semantic_search(
    queries: &Matrix,
    corpus: &Matrix,
    config: &SearchConfig,
) -> Result<Vec<Vec<SearchResult>>> {
    use rayon::prelude::*;

    config.validate()?;
    check_pair(queries, corpus)?;

    debug!(
        query_chunks = num_chunks(queries.rows(), config.query_chunk_size),
        corpus_chunks = num_chunks(corpus.rows(), config.corpus_chunk_size),
        threads = rayon::current_num_threads(),
        "starting parallel chunked search"
    );

    let query_chunks: Vec<MatrixView<'_>> = queries.chunks(config.query_chunk_size).collect();
    let per_chunk: Vec<Vec<Vec<SearchResult>>> = query_chunks
        .into_par_iter()
        .map(|query_chunk| par_rank_query_chunk(query_chunk, corpus, config))
        .collect::<Result<_>>()?;

    Ok(per_chunk.into_iter().flatten().collect())
}

#[cfg(feature = "parallel")]
fn par_rank_query_chunk(
    query_chunk: MatrixView<'_>,
    corpus: &Matrix,
    config: &SearchConfig,
) -> Result<Vec<Vec<SearchResult>>> {
    use rayon::prelude::*;

    let rows = query_chunk.rows();
    let corpus_chunks: Vec<MatrixView<'_>> = corpus.chunks(config.corpus_chunk_size).collect();

    let merged = corpus_chunks
        .into_par_iter()
        .map(|corpus_chunk| -> Result<Vec<TopK>> {
            let mut sets = empty_sets(rows, config.top_k, corpus_chunk.rows());
            fold_block(&mut sets, query_chunk, corpus_chunk, config.score_function)?;
            Ok(sets)
        })
        .try_reduce(
            || empty_sets(rows, config.top_k, corpus.rows()),
            |mut acc, sets| {
                for (into, from) in acc.iter_mut().zip(sets) {
                    into.merge(from);
                }
                Ok(acc)
            },
        )?;

    Ok(merged.into_iter().map(TopK::into_sorted_vec).collect())
}
