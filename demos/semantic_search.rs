//! Chunked Semantic Search
//!
//! Scores 500 queries against a 10,000-vector, 512d corpus in blocks and
//! reports the top hits for a few queries, checked against brute force.
//!
//! ```bash
//! RUST_LOG=semsearch=debug cargo run --example semantic_search --release
//! ```

use std::time::Instant;

use semsearch::{cosine, semantic_search, Matrix, SearchConfig, SearchResult};
use tracing_subscriber::EnvFilter;

const DIM: usize = 512;
const CORPUS_SIZE: usize = 10_000;
const NUM_QUERIES: usize = 500;
const TOP_K: usize = 10;

fn main() -> Result<(), semsearch::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Chunked Semantic Search");
    println!("=======================\n");
    println!(
        "Corpus: {} vectors, {}d; {} queries; top-{}\n",
        CORPUS_SIZE, DIM, NUM_QUERIES, TOP_K
    );

    let corpus_rows: Vec<Vec<f32>> = (0..CORPUS_SIZE)
        .map(|i| generate_vec(DIM, i as u64))
        .collect();
    // Queries are perturbed copies of every 20th corpus vector.
    let query_rows: Vec<Vec<f32>> = (0..NUM_QUERIES)
        .map(|q| {
            let noise = generate_vec(DIM, 0xBEEF + q as u64);
            corpus_rows[q * 20]
                .iter()
                .zip(&noise)
                .map(|(x, n)| x + 0.1 * n)
                .collect()
        })
        .collect();

    let corpus = Matrix::from_rows(&corpus_rows)?;
    let queries = Matrix::from_rows(&query_rows)?;
    let config = SearchConfig::new(TOP_K)
        .with_query_chunk_size(100)
        .with_corpus_chunk_size(2_500);

    let t0 = Instant::now();
    let hits = semantic_search(&queries, &corpus, &config)?;
    let elapsed = t0.elapsed();

    let found = hits
        .iter()
        .enumerate()
        .filter(|(q, h)| h.first().map(|r| r.corpus_id) == Some(q * 20))
        .count();

    println!("Timing");
    println!("------");
    println!("  Chunked search: {:?}", elapsed);
    println!(
        "  Pairs scored:   {} ({:.1} M/s)\n",
        NUM_QUERIES * CORPUS_SIZE,
        (NUM_QUERIES * CORPUS_SIZE) as f64 / elapsed.as_secs_f64() / 1e6
    );

    println!("Quality");
    println!("-------");
    println!(
        "  Source vector ranked first: {}/{}\n",
        found, NUM_QUERIES
    );

    for q in [0, 1, NUM_QUERIES - 1] {
        let exact = brute_force(&query_rows[q], &corpus_rows, TOP_K);
        let agree = exact == hits[q];
        println!("Query {} (source id {})", q, q * 20);
        for (rank, hit) in hits[q].iter().take(3).enumerate() {
            println!(
                "  #{:>2} id={:>5} score={:.6}",
                rank + 1,
                hit.corpus_id,
                hit.score
            );
        }
        println!("  matches brute force: {}\n", agree);
    }

    Ok(())
}

/// Score everything, sort by rank, truncate.
fn brute_force(query: &[f32], corpus: &[Vec<f32>], k: usize) -> Vec<SearchResult> {
    let mut all: Vec<SearchResult> = corpus
        .iter()
        .enumerate()
        .map(|(id, v)| SearchResult::new(id, cosine(query, v)))
        .collect();
    all.sort_by(|a, b| a.rank_cmp(b));
    all.truncate(k);
    all
}

/// Deterministic pseudo-random vector (xorshift).
fn generate_vec(dim: usize, seed: u64) -> Vec<f32> {
    let mut state = seed ^ 0x517cc1b727220a95;
    (0..dim)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state as f32 / u64::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}
