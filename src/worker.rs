use log::{debug, info};

use crate::candidate::{candidate_string, encode_candidate};
use crate::keyspace::WorkRange;
use crate::matcher::DigestMatcher;
use crate::search::SearchContext;

/// What a single worker did with its range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub range: WorkRange,
    /// Candidates hashed by this worker, the matching one included.
    pub processed: u64,
    /// Set only on the worker that claimed the match.
    pub found: Option<String>,
}

/// Tests every address of `range` in increasing order until the target is
/// found, the range runs out, or the shared cancellation flag is raised.
///
/// Progress is published to the shared counter once per `batch_size`
/// candidates, and whatever is left of a partial batch is flushed before
/// returning, whichever way the loop ended.
pub fn search_range(ctx: &SearchContext, range: WorkRange) -> WorkerReport {
    let mut matcher = DigestMatcher::new(*ctx.target());
    let mut buf = Vec::with_capacity(15);
    let batch_size = ctx.batch_size();
    let progress = ctx.progress();
    let cancel = ctx.cancellation();

    let mut pending = 0u64;
    let mut processed = 0u64;
    let mut found = None;

    debug!("worker starting on {} ({} candidates)", range, range.len());

    for ip in range.start..=range.end {
        if cancel.is_cancelled() {
            debug!("worker on {} cancelled after {}", range, processed + pending);
            break;
        }

        buf.clear();
        encode_candidate(ip, &mut buf);
        pending += 1;

        if matcher.matches(&buf) {
            let candidate = candidate_string(ip);
            if ctx.record_match(candidate.clone()) {
                info!("match {} found in {}", candidate, range);
                found = Some(candidate);
            }
            break;
        }

        if pending == batch_size {
            progress.add(pending);
            processed += pending;
            pending = 0;
        }
    }

    if pending > 0 {
        progress.add(pending);
        processed += pending;
    }

    WorkerReport {
        range,
        processed,
        found,
    }
}
