//! Row-major embedding matrices and borrowed row-range views.
//!
//! A [`Matrix`] owns a set of equally sized vectors stored contiguously:
//!
//! ```text
//! data[i * dim + d] = vector i, dimension d
//! ```
//!
//! Row index is the item's identity (query id or corpus id) for the whole
//! search call. A [`MatrixView`] borrows a contiguous run of rows and
//! remembers where that run starts, so chunk-local indices can always be
//! mapped back to global ids.

use std::ops::Range;

use crate::dense::norm;
use crate::{Error, Result};

/// Owned set of vectors sharing one dimensionality.
///
/// # Example
///
/// ```rust
/// use semsearch::Matrix;
///
/// let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(m.rows(), 2);
/// assert_eq!(m.dim(), 3);
/// assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    rows: usize,
    dim: usize,
}

impl Matrix {
    /// Build from row vectors, copying into contiguous storage.
    ///
    /// An empty input yields a `0 × 0` matrix.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if any row differs in length from the first.
    pub fn from_rows(vectors: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Ok(Self {
                data: Vec::new(),
                rows: 0,
                dim: 0,
            });
        };

        let dim = first.len();
        let mut data = Vec::with_capacity(dim * vectors.len());
        for v in vectors {
            if v.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: v.len(),
                });
            }
            data.extend_from_slice(v);
        }

        Ok(Self {
            data,
            rows: vectors.len(),
            dim,
        })
    }

    /// Take ownership of flat row-major data.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `data.len() != rows * dim`, reporting
    /// the expected and actual lengths. If `rows * dim` does not fit in a
    /// `usize`, the error instead reports `dim` against the per-row length the
    /// data actually holds (`data.len() / rows`).
    pub fn from_flat(data: Vec<f32>, rows: usize, dim: usize) -> Result<Self> {
        let Some(expected) = rows.checked_mul(dim) else {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: data.len() / rows,
            });
        };
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { data, rows, dim })
    }

    /// Number of vectors.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Dimensionality of every vector.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// True if the matrix holds no vectors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Vector `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        assert!(i < self.rows, "row {i} out of bounds ({} rows)", self.rows);
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Flat row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Borrow the whole matrix.
    #[inline]
    pub fn as_view(&self) -> MatrixView<'_> {
        self.view(0..self.rows)
    }

    /// Borrow rows `range`. Ids reported through the view stay global.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn view(&self, range: Range<usize>) -> MatrixView<'_> {
        assert!(
            range.start <= range.end && range.end <= self.rows,
            "row range {range:?} out of bounds ({} rows)",
            self.rows
        );
        MatrixView {
            data: &self.data[range.start * self.dim..range.end * self.dim],
            rows: range.end - range.start,
            dim: self.dim,
            offset: range.start,
        }
    }

    /// Split into consecutive views of `chunk_size` rows; the last may be shorter.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size == 0`.
    pub fn chunks(&self, chunk_size: usize) -> impl Iterator<Item = MatrixView<'_>> + '_ {
        assert!(chunk_size > 0, "chunk_size must be >= 1");
        (0..self.rows)
            .step_by(chunk_size)
            .map(move |start| self.view(start..(start + chunk_size).min(self.rows)))
    }

    /// Iterate over rows in id order.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }
}

/// Borrowed contiguous run of rows from a [`Matrix`].
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    data: &'a [f32],
    rows: usize,
    dim: usize,
    offset: usize,
}

impl<'a> MatrixView<'a> {
    /// Number of vectors in the view.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Dimensionality of every vector.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Global id of local row 0.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True if the view holds no vectors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Local row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [f32] {
        assert!(i < self.rows, "row {i} out of bounds ({} rows)", self.rows);
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over rows in local order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [f32]> {
        let view = *self;
        (0..self.rows).map(move |i| view.row(i))
    }

    /// L2 norm of every row.
    pub fn norms(&self) -> Vec<f32> {
        self.iter().map(norm).collect()
    }
}
