//! Chunk Size Sweep
//!
//! Runs the same search under several chunkings. Results are identical for
//! every chunking; only time and peak block size change.
//!
//! ```bash
//! cargo run --example chunk_sizes --release
//! cargo run --example chunk_sizes --release --features parallel
//! ```

use std::time::Instant;

use rand::prelude::*;
use semsearch::{semantic_search, Matrix, SearchConfig};

const DIM: usize = 384;
const CORPUS_SIZE: usize = 20_000;
const NUM_QUERIES: usize = 200;
const TOP_K: usize = 10;

fn main() -> Result<(), semsearch::Error> {
    println!("Chunk Size Sweep");
    println!("================\n");
    println!(
        "Corpus: {} vectors, {}d; {} queries; top-{}\n",
        CORPUS_SIZE, DIM, NUM_QUERIES, TOP_K
    );

    let mut rng = StdRng::seed_from_u64(42);
    let corpus = random_matrix(&mut rng, CORPUS_SIZE)?;
    let queries = random_matrix(&mut rng, NUM_QUERIES)?;

    let baseline = semantic_search(&queries, &corpus, &SearchConfig::new(TOP_K))?;

    println!(
        "  {:>8} {:>8} {:>12} {:>12} {:>9}",
        "queries", "corpus", "block (MiB)", "time", "same"
    );
    for (qc, cc) in [
        (1, 1_000),
        (10, 1_000),
        (100, 1_000),
        (100, 5_000),
        (200, 20_000),
        (100, 500_000),
    ] {
        let config = SearchConfig::new(TOP_K)
            .with_query_chunk_size(qc)
            .with_corpus_chunk_size(cc);

        let t0 = Instant::now();
        let hits = semantic_search(&queries, &corpus, &config)?;
        let elapsed = t0.elapsed();

        let block_mib = (qc.min(NUM_QUERIES) * cc.min(CORPUS_SIZE) * 4) as f64 / (1 << 20) as f64;
        println!(
            "  {:>8} {:>8} {:>12.2} {:>12?} {:>9}",
            qc,
            cc,
            block_mib,
            elapsed,
            hits == baseline
        );
    }

    #[cfg(feature = "parallel")]
    {
        let config = SearchConfig::new(TOP_K)
            .with_query_chunk_size(20)
            .with_corpus_chunk_size(2_000);
        let t0 = Instant::now();
        let hits = semsearch::par_semantic_search(&queries, &corpus, &config)?;
        println!(
            "\n  parallel (20 x 2000): {:?}, same: {}",
            t0.elapsed(),
            hits == baseline
        );
    }

    Ok(())
}

fn random_matrix(rng: &mut StdRng, rows: usize) -> Result<Matrix, semsearch::Error> {
    let data = (0..rows * DIM).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Matrix::from_flat(data, rows, DIM)
}
