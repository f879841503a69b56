//! Bounded online top-k selection.
//!
//! A [`TopK`] keeps at most `k` candidates. Once full, a new candidate is
//! admitted only if it ranks strictly better than the worst member, which it
//! then evicts. The worst member sits at the root of a binary heap, so the
//! admission check is O(1) and an eviction is O(log k).
//!
//! # Rank order
//!
//! 1. Higher score first. `-0.0` and `0.0` are equal.
//! 2. NaN ranks below every real score, `-inf` included.
//! 3. Equal scores: lower `corpus_id` first.
//!
//! Rule 3 makes the kept set and its order independent of the order in which
//! candidates arrive. When candidates arrive in ascending id order (the
//! sequential sweep), a candidate that ties the worst member always has the
//! higher id and is discarded, so ties never evict.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One ranked hit: a corpus id and its score against a query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    /// Row of the hit in the (unchunked) corpus matrix.
    pub corpus_id: usize,
    /// Similarity score. NaN for degenerate (zero-norm) inputs.
    pub score: f32,
}

impl SearchResult {
    /// Create a hit.
    pub fn new(corpus_id: usize, score: f32) -> Self {
        Self { corpus_id, score }
    }

    /// Compare by rank: `Less` means `self` ranks ahead of `other`.
    ///
    /// ```rust
    /// use std::cmp::Ordering;
    /// use semsearch::SearchResult;
    ///
    /// let a = SearchResult::new(3, 0.9);
    /// let b = SearchResult::new(1, 0.5);
    /// let nan = SearchResult::new(0, f32::NAN);
    /// assert_eq!(a.rank_cmp(&b), Ordering::Less);
    /// assert_eq!(nan.rank_cmp(&b), Ordering::Greater);
    /// ```
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        score_desc(self.score, other.score).then_with(|| self.corpus_id.cmp(&other.corpus_id))
    }
}

fn score_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Heap entry ordered by rank, so the max-heap root is the worst member.
#[derive(Clone, Copy, Debug)]
struct Ranked(SearchResult);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

/// Bounded set of the `k` best-ranked candidates seen so far.
///
/// # Example
///
/// ```rust
/// use semsearch::TopK;
///
/// let mut top = TopK::new(2);
/// top.push(0, 0.1);
/// top.push(1, 0.9);
/// top.push(2, 0.5); // evicts id 0
/// top.push(3, 0.5); // ties the worst, higher id: discarded
///
/// let ids: Vec<usize> = top.into_sorted_vec().iter().map(|r| r.corpus_id).collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Ranked>,
}

impl TopK {
    /// Empty set holding at most `k` members.
    ///
    /// Nothing is allocated up front, so any `k` is accepted, `usize::MAX`
    /// included. The heap grows as candidates are admitted.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::new(),
        }
    }

    /// Like [`TopK::new`], but reserves room for `min(k, expected)` members.
    ///
    /// `expected` is the number of candidates that will be offered, e.g. the
    /// corpus size. It only sizes the allocation; the capacity stays `k`.
    pub fn with_expected(k: usize, expected: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.min(expected)),
        }
    }

    /// Maximum number of members.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Current number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing has been admitted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// True once `len() == capacity()`.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Worst-ranked member, the next to be evicted.
    #[inline]
    pub fn worst(&self) -> Option<SearchResult> {
        self.heap.peek().map(|r| r.0)
    }

    /// Score of the worst-ranked member (NaN if that member is degenerate).
    #[inline]
    pub fn min_score(&self) -> Option<f32> {
        self.worst().map(|r| r.score)
    }

    /// Offer a candidate. Returns `true` if it was admitted.
    pub fn push(&mut self, corpus_id: usize, score: f32) -> bool {
        let candidate = Ranked(SearchResult::new(corpus_id, score));

        if self.heap.len() < self.k {
            self.heap.push(candidate);
            return true;
        }

        if let Some(mut worst) = self.heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
                return true;
            }
        }
        false
    }

    /// Fold every member of `other` into `self`.
    ///
    /// The result does not depend on which side held a candidate first.
    pub fn merge(&mut self, other: TopK) {
        for Ranked(r) in other.heap {
            self.push(r.corpus_id, r.score);
        }
    }

    /// Finalize: members in rank order, at most `k` of them.
    pub fn into_sorted_vec(self) -> Vec<SearchResult> {
        let mut out: Vec<SearchResult> = self
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|r| r.0)
            .collect();
        out.truncate(self.k);
        out
    }
}

impl Extend<(usize, f32)> for TopK {
    fn extend<I: IntoIterator<Item = (usize, f32)>>(&mut self, iter: I) {
        for (corpus_id, score) in iter {
            self.push(corpus_id, score);
        }
    }
}
