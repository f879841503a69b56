//! Integration tests for chunked top-k search.

use semsearch::{
    search, semantic_search, Error, Matrix, ScoreFunction, SearchConfig, SearchResult,
};

fn axes_queries() -> Vec<Vec<f32>> {
    vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]
}

fn axes_corpus() -> Vec<Vec<f32>> {
    vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ]
}

fn ids(hits: &[SearchResult]) -> Vec<usize> {
    hits.iter().map(|h| h.corpus_id).collect()
}

// =============================================================================
// Reference example
// =============================================================================

#[test]
fn axes_example_exact_output() {
    let hits = search(&axes_queries(), &axes_corpus(), 1, 2, 2).unwrap();

    assert_eq!(
        hits,
        vec![
            vec![SearchResult::new(0, 1.0), SearchResult::new(1, 0.0)],
            vec![SearchResult::new(1, 1.0), SearchResult::new(0, 0.0)],
        ]
    );
}

#[test]
fn axes_example_every_chunking() {
    let expected = search(&axes_queries(), &axes_corpus(), 1, 2, 2).unwrap();
    for qc in 1..=3 {
        for cc in 1..=4 {
            let hits = search(&axes_queries(), &axes_corpus(), qc, cc, 2).unwrap();
            assert_eq!(hits, expected, "query_chunk={qc}, corpus_chunk={cc}");
        }
    }
}

#[test]
fn top_k_larger_than_corpus_returns_everything_sorted() {
    let hits = search(&axes_queries(), &axes_corpus(), 1, 1, 10).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(ids(&hits[0]), vec![0, 1, 2]);
    assert_eq!(ids(&hits[1]), vec![1, 0, 2]);
}

#[test]
fn unbounded_top_k_returns_whole_corpus() {
    let queries = vec![vec![1.0, 0.0]];
    let corpus = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];

    let hits = search(&queries, &corpus, 1, 2, usize::MAX).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(ids(&hits[0]), vec![0, 2, 1]);
    assert_eq!(hits[0][0].score, 1.0);
    assert!((hits[0][1].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert_eq!(hits[0][2].score, 0.0);
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn ranks_by_cosine_not_magnitude() {
    let queries = vec![vec![1.0, 0.0]];
    let corpus = vec![
        vec![100.0, 100.0], // 45 degrees, large
        vec![0.1, 0.0],     // parallel, tiny
        vec![-5.0, 0.1],    // nearly opposite
    ];

    let hits = search(&queries, &corpus, 4, 4, 3).unwrap();
    assert_eq!(ids(&hits[0]), vec![1, 0, 2]);
    assert!((hits[0][0].score - 1.0).abs() < 1e-6);
    assert!((hits[0][1].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

#[test]
fn dot_product_scoring_ranks_by_magnitude() {
    let queries = Matrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
    let corpus = Matrix::from_rows(&[vec![100.0, 100.0], vec![0.1, 0.0]]).unwrap();
    let config = SearchConfig::new(2).with_score_function(ScoreFunction::DotProduct);

    let hits = semantic_search(&queries, &corpus, &config).unwrap();
    assert_eq!(
        hits[0],
        vec![SearchResult::new(0, 100.0), SearchResult::new(1, 0.1)]
    );
}

#[test]
fn ids_are_global_across_chunks() {
    // Best match for each query sits in the last corpus chunk.
    let queries: Vec<Vec<f32>> = (0..5)
        .map(|q| (0..5).map(|d| if d == q { 1.0 } else { 0.0 }).collect())
        .collect();
    let mut corpus: Vec<Vec<f32>> = vec![vec![0.2; 5]; 7];
    corpus.extend(queries.iter().cloned());

    let hits = search(&queries, &corpus, 2, 3, 1).unwrap();
    for (q, h) in hits.iter().enumerate() {
        assert_eq!(h[0].corpus_id, 7 + q);
        assert_eq!(h[0].score, 1.0);
    }
}

#[test]
fn scores_non_increasing() {
    let queries: Vec<Vec<f32>> = (0..3)
        .map(|s| (0..8).map(|d| ((s * 8 + d) as f32 * 0.37).sin()).collect())
        .collect();
    let corpus: Vec<Vec<f32>> = (0..40)
        .map(|s| (0..8).map(|d| ((s * 8 + d) as f32 * 0.91).cos()).collect())
        .collect();

    let hits = search(&queries, &corpus, 2, 7, 15).unwrap();
    for h in &hits {
        assert_eq!(h.len(), 15);
        for w in h.windows(2) {
            assert!(w[0].score >= w[1].score, "not sorted: {h:?}");
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn zero_parameters_rejected() {
    let q = axes_queries();
    let c = axes_corpus();

    assert_eq!(
        search(&q, &c, 0, 1, 1),
        Err(Error::InvalidParameter {
            name: "query_chunk_size",
            value: 0
        })
    );
    assert_eq!(
        search(&q, &c, 1, 0, 1),
        Err(Error::InvalidParameter {
            name: "corpus_chunk_size",
            value: 0
        })
    );
    assert_eq!(
        search(&q, &c, 1, 1, 0),
        Err(Error::InvalidParameter {
            name: "top_k",
            value: 0
        })
    );
}

#[test]
fn ragged_corpus_rejected() {
    let corpus = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0]];
    assert_eq!(
        search(&axes_queries(), &corpus, 1, 1, 1),
        Err(Error::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn query_corpus_dimension_mismatch_rejected() {
    let queries = vec![vec![1.0, 0.0]];
    assert_eq!(
        search(&queries, &axes_corpus(), 1, 1, 1),
        Err(Error::DimensionMismatch {
            expected: 2,
            found: 3
        })
    );
}

// =============================================================================
// Empty inputs
// =============================================================================

#[test]
fn no_queries() {
    let hits = search(&[], &axes_corpus(), 1, 1, 3).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn empty_corpus() {
    let hits = search(&axes_queries(), &[], 1, 1, 3).unwrap();
    assert_eq!(hits, vec![Vec::new(), Vec::new()]);
}
