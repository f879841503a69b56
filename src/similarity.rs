//! Pairwise similarity between a block of queries and a block of corpus vectors.
//!
//! # Cost
//!
//! Filling a `Q × C` block costs O(Q·C·D) and dominates the whole search.
//! Row norms are computed once per block (O((Q + C)·D)), never per cell.
//!
//! # Degenerate vectors
//!
//! A zero-norm row makes every cosine cell it touches NaN. The block keeps
//! those NaNs as produced; ranking decides what to do with them.

use crate::dense::dot;
use crate::matrix::MatrixView;
use crate::{Error, Result};

/// How a query/corpus pair is scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScoreFunction {
    /// `dot(q, c) / (norm(q) * norm(c))`.
    #[default]
    Cosine,
    /// Raw `dot(q, c)`. Equivalent to cosine for L2-normalized embeddings, and cheaper.
    DotProduct,
}

impl ScoreFunction {
    /// Score every query in `queries` against every vector in `corpus`.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if both views are non-empty and their
    /// dimensionalities differ.
    pub fn score_block(
        self,
        queries: MatrixView<'_>,
        corpus: MatrixView<'_>,
    ) -> Result<SimilarityBlock> {
        match self {
            ScoreFunction::Cosine => cos_sim(queries, corpus),
            ScoreFunction::DotProduct => dot_score(queries, corpus),
        }
    }
}

/// Dense `Q × C` score grid for one (query chunk, corpus chunk) pair.
///
/// Row = local query index, column = local corpus index. The offsets map
/// local indices back to ids in the unchunked matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityBlock {
    scores: Vec<f32>,
    num_queries: usize,
    num_corpus: usize,
    query_offset: usize,
    corpus_offset: usize,
}

impl SimilarityBlock {
    fn fill(
        queries: MatrixView<'_>,
        corpus: MatrixView<'_>,
        mut cell: impl FnMut(usize, usize) -> f32,
    ) -> Self {
        let (num_queries, num_corpus) = (queries.rows(), corpus.rows());
        let mut scores = Vec::with_capacity(num_queries * num_corpus);
        for i in 0..num_queries {
            for j in 0..num_corpus {
                scores.push(cell(i, j));
            }
        }
        Self {
            scores,
            num_queries,
            num_corpus,
            query_offset: queries.offset(),
            corpus_offset: corpus.offset(),
        }
    }

    /// Number of query rows.
    #[inline]
    pub fn num_queries(&self) -> usize {
        self.num_queries
    }

    /// Number of corpus columns.
    #[inline]
    pub fn num_corpus(&self) -> usize {
        self.num_corpus
    }

    /// Global query id of row 0.
    #[inline]
    pub fn query_offset(&self) -> usize {
        self.query_offset
    }

    /// Global corpus id of column 0.
    #[inline]
    pub fn corpus_offset(&self) -> usize {
        self.corpus_offset
    }

    /// Score at local `(query, corpus)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, query: usize, corpus: usize) -> f32 {
        assert!(
            query < self.num_queries && corpus < self.num_corpus,
            "cell ({query}, {corpus}) out of bounds ({} x {})",
            self.num_queries,
            self.num_corpus
        );
        self.scores[query * self.num_corpus + corpus]
    }

    /// All scores of local query row `query`.
    #[inline]
    pub fn row(&self, query: usize) -> &[f32] {
        let start = query * self.num_corpus;
        &self.scores[start..start + self.num_corpus]
    }

    /// `(global corpus id, score)` pairs of local query row `query`, ascending by id.
    pub fn scored_row(&self, query: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let offset = self.corpus_offset;
        self.row(query)
            .iter()
            .enumerate()
            .map(move |(j, &score)| (offset + j, score))
    }

    /// Flat row-major scores.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.scores
    }

    /// Rows as owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        (0..self.num_queries).map(|i| self.row(i).to_vec()).collect()
    }
}

fn check_dims(queries: &MatrixView<'_>, corpus: &MatrixView<'_>) -> Result<()> {
    if !queries.is_empty() && !corpus.is_empty() && queries.dim() != corpus.dim() {
        return Err(Error::DimensionMismatch {
            expected: queries.dim(),
            found: corpus.dim(),
        });
    }
    Ok(())
}

/// Cosine similarity of every query against every corpus vector.
///
/// `cell(i, j) = dot(q_i, c_j) / (norm(q_i) * norm(c_j))`
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the views disagree on dimensionality.
///
/// # Example
///
/// ```rust
/// use semsearch::{cos_sim, Matrix};
///
/// let q = Matrix::from_rows(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]).unwrap();
/// let c = Matrix::from_rows(&[
///     vec![1.0, 0.0, 0.0],
///     vec![0.0, 1.0, 0.0],
///     vec![0.0, 0.0, 1.0],
/// ])
/// .unwrap();
///
/// let block = cos_sim(q.as_view(), c.as_view()).unwrap();
/// assert_eq!(block.to_rows(), vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
/// ```
pub fn cos_sim(queries: MatrixView<'_>, corpus: MatrixView<'_>) -> Result<SimilarityBlock> {
    check_dims(&queries, &corpus)?;

    let query_norms = queries.norms();
    let corpus_norms = corpus.norms();

    Ok(SimilarityBlock::fill(queries, corpus, |i, j| {
        dot(queries.row(i), corpus.row(j)) / (query_norms[i] * corpus_norms[j])
    }))
}

/// Raw dot product of every query against every corpus vector.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the views disagree on dimensionality.
pub fn dot_score(queries: MatrixView<'_>, corpus: MatrixView<'_>) -> Result<SimilarityBlock> {
    check_dims(&queries, &corpus)?;

    Ok(SimilarityBlock::fill(queries, corpus, |i, j| {
        dot(queries.row(i), corpus.row(j))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::cosine;
    use crate::Matrix;

    fn m(rows: &[&[f32]]) -> Matrix {
        let rows: Vec<Vec<f32>> = rows.iter().map(|r| r.to_vec()).collect();
        Matrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_identity_block() {
        let q = m(&[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]]);
        let c = m(&[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]]);
        let block = cos_sim(q.as_view(), c.as_view()).unwrap();

        assert_eq!(block.num_queries(), 2);
        assert_eq!(block.num_corpus(), 3);
        assert_eq!(
            block.to_rows(),
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn test_matches_pairwise_cosine() {
        let q = m(&[&[0.3, -1.0, 2.0], &[4.0, 4.0, 0.5]]);
        let c = m(&[&[1.0, 1.0, 1.0], &[-2.0, 0.5, 0.0], &[0.1, 0.2, 0.3]]);
        let block = cos_sim(q.as_view(), c.as_view()).unwrap();

        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(block.get(i, j), cosine(q.row(i), c.row(j)));
            }
        }
    }

    #[test]
    fn test_offsets_follow_views() {
        let q = m(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
        let c = m(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0], &[-1.0, 0.0]]);
        let block = cos_sim(q.view(1..3), c.view(2..4)).unwrap();

        assert_eq!(block.query_offset(), 1);
        assert_eq!(block.corpus_offset(), 2);
        let ids: Vec<usize> = block.scored_row(0).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 3]);
        // q[1] = (0,1) vs c[3] = (-1,0)
        assert!(block.get(0, 1).abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm_row_is_nan() {
        let q = m(&[&[0.0, 0.0], &[1.0, 0.0]]);
        let c = m(&[&[1.0, 0.0], &[0.0, 0.0]]);
        let block = cos_sim(q.as_view(), c.as_view()).unwrap();

        assert!(block.get(0, 0).is_nan());
        assert!(block.get(0, 1).is_nan());
        assert_eq!(block.get(1, 0), 1.0);
        assert!(block.get(1, 1).is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        let q = m(&[&[1.0, 0.0]]);
        let c = m(&[&[1.0, 0.0, 0.0]]);
        assert_eq!(
            cos_sim(q.as_view(), c.as_view()).unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_empty_corpus_block() {
        let q = m(&[&[1.0, 0.0]]);
        let c = Matrix::from_rows(&[]).unwrap();
        let block = cos_sim(q.as_view(), c.as_view()).unwrap();
        assert_eq!(block.num_corpus(), 0);
        assert!(block.row(0).is_empty());
    }

    #[test]
    fn test_dot_score_unnormalized() {
        let q = m(&[&[2.0, 0.0]]);
        let c = m(&[&[3.0, 0.0], &[0.0, 5.0]]);
        let block = ScoreFunction::DotProduct
            .score_block(q.as_view(), c.as_view())
            .unwrap();
        assert_eq!(block.row(0), &[6.0, 0.0]);

        let cos = ScoreFunction::default()
            .score_block(q.as_view(), c.as_view())
            .unwrap();
        assert_eq!(cos.row(0), &[1.0, 0.0]);
    }
}
