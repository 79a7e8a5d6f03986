use std::time::Instant;

use crate::candidate::encode_candidate;
use crate::matcher::{sha256_of, DigestMatcher};

#[derive(Debug, Clone, Copy)]
pub struct BenchmarkReport {
    pub candidates: u32,
    pub duration_secs: f64,
    pub candidates_per_sec: f64,
}

/// Single-core hashing rate over the first `candidates` addresses.
pub fn benchmark_hashing(candidates: u32) -> BenchmarkReport {
    // no dotted quad hashes to this, so every candidate goes the full path
    let mut matcher = DigestMatcher::new(sha256_of("benchmark"));
    let mut buf = Vec::with_capacity(15);
    let mut hits = 0u32;

    let start_time = Instant::now();
    for ip in 0..candidates {
        buf.clear();
        encode_candidate(ip, &mut buf);
        hits += matcher.matches(&buf) as u32;
    }
    let duration_secs = start_time.elapsed().as_secs_f64();
    debug_assert_eq!(hits, 0);

    let candidates_per_sec = if duration_secs > 0.0 {
        candidates as f64 / duration_secs
    } else {
        0.0
    };

    BenchmarkReport {
        candidates,
        duration_secs,
        candidates_per_sec,
    }
}
