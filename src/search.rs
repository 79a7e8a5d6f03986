use std::io::{self, Write};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use log::{debug, info, warn};
use rayon::ThreadPoolBuilder;

use crate::error::{Result, SearchError};
use crate::keyspace::Keyspace;
use crate::matcher::TargetDigest;
use crate::progress::{CancellationFlag, ProgressCounter, StopReason};
use crate::reporter::Reporter;
use crate::worker::{self, WorkerReport};
use crate::DEFAULT_BATCH_SIZE;

/// State shared by every worker and the reporter for one search run.
pub struct SearchContext {
    target: TargetDigest,
    keyspace: Keyspace,
    batch_size: u64,
    progress: ProgressCounter,
    cancel: CancellationFlag,
    found: OnceLock<String>,
}

impl SearchContext {
    pub fn new(target: TargetDigest, keyspace: Keyspace, batch_size: u64) -> Result<Self> {
        if batch_size == 0 {
            return Err(SearchError::ZeroBatchSize);
        }
        Ok(SearchContext {
            target,
            keyspace,
            batch_size,
            progress: ProgressCounter::new(keyspace.total()),
            cancel: CancellationFlag::new(),
            found: OnceLock::new(),
        })
    }

    pub fn target(&self) -> &TargetDigest {
        &self.target
    }

    pub fn keyspace(&self) -> Keyspace {
        self.keyspace
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn progress(&self) -> &ProgressCounter {
        &self.progress
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Stores the match and raises the stop flag. Returns false if another
    /// worker already claimed the result, in which case `candidate` is dropped.
    pub fn record_match(&self, candidate: String) -> bool {
        let won = self.found.set(candidate).is_ok();
        self.cancel.cancel(StopReason::Matched);
        won
    }

    pub fn found(&self) -> Option<&str> {
        self.found.get().map(String::as_str)
    }

    /// How the run ended. A keyspace that was tested in full is `Exhausted`
    /// even if an interrupt arrived after the last worker finished.
    pub fn outcome(&self) -> SearchOutcome {
        if let Some(ip) = self.found() {
            return SearchOutcome::Found { ip: ip.to_string() };
        }
        if self.progress.processed() == self.keyspace.total() {
            return SearchOutcome::Exhausted;
        }
        match self.cancel.reason() {
            Some(StopReason::Interrupted) => SearchOutcome::Interrupted,
            _ => SearchOutcome::Exhausted,
        }
    }

    /// Asks all workers to stop, e.g. from a Ctrl-C handler.
    pub fn interrupt(&self) -> bool {
        self.cancel.cancel(StopReason::Interrupted)
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub workers: usize,
    pub batch_size: u64,
    pub report_interval: Duration,
    pub keyspace: Keyspace,
    /// Render the live progress line while searching.
    pub report: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            workers: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
            report_interval: Duration::from_millis(100),
            keyspace: Keyspace::FULL,
            report: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { ip: String },
    /// Every candidate was tested and none matched.
    Exhausted,
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub outcome: SearchOutcome,
    pub processed: u64,
    pub elapsed: Duration,
    pub workers: Vec<WorkerReport>,
}

pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        if config.batch_size == 0 {
            return Err(SearchError::ZeroBatchSize);
        }
        Ok(Searcher { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn context(&self, target: TargetDigest) -> Result<SearchContext> {
        SearchContext::new(target, self.config.keyspace, self.config.batch_size)
    }

    pub fn run(&self, ctx: &SearchContext) -> Result<SearchSummary> {
        self.run_with_output(ctx, io::stdout())
    }

    /// Searches `ctx`'s keyspace with one pool thread per range, rendering
    /// progress to `out` when reporting is enabled.
    pub fn run_with_output<W: Write + Send>(
        &self,
        ctx: &SearchContext,
        out: W,
    ) -> Result<SearchSummary> {
        let ranges = ctx.keyspace().partition(self.config.workers)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .thread_name(|i| format!("search-worker-{}", i))
            .build()?;

        info!(
            "searching {} ({} candidates) with {} workers, batch size {}",
            ctx.keyspace(),
            ctx.keyspace().total(),
            ranges.len(),
            ctx.batch_size()
        );

        let (report_tx, report_rx) = unbounded::<WorkerReport>();

        let mut reports = thread::scope(|s| -> Result<Vec<WorkerReport>> {
            let reporter = if self.config.report {
                let reporter = Reporter::new(out, self.config.report_interval);
                let handle = thread::Builder::new()
                    .name("search-reporter".to_string())
                    .spawn_scoped(s, move || reporter.run(ctx.progress(), ctx.cancellation()))?;
                Some(handle)
            } else {
                None
            };

            pool.scope(|ps| {
                for &range in &ranges {
                    let report_tx = report_tx.clone();
                    ps.spawn(move |_| {
                        let report = worker::search_range(ctx, range);
                        let _ = report_tx.send(report);
                    });
                }
            });
            drop(report_tx);

            let reports: Vec<WorkerReport> = report_rx.iter().collect();

            // all workers are done; stop the reporter if nobody matched
            if ctx.cancellation().cancel(StopReason::Exhausted) {
                debug!("all {} ranges exhausted without a match", reports.len());
            }

            // every worker has flushed, so the closing line shows the exact count
            if let Some(handle) = reporter {
                match handle.join() {
                    Ok(Ok(reporter)) => {
                        if let Err(e) = reporter.finish(&ctx.progress().snapshot()) {
                            warn!("progress reporter stopped: {}", e);
                        }
                    }
                    Ok(Err(e)) => warn!("progress reporter stopped: {}", e),
                    Err(_) => warn!("progress reporter panicked"),
                }
            }

            Ok(reports)
        })?;

        reports.sort_by_key(|r| r.range.start);

        let summary = SearchSummary {
            outcome: ctx.outcome(),
            processed: ctx.progress().processed(),
            elapsed: ctx.progress().elapsed(),
            workers: reports,
        };
        info!(
            "search finished: {:?} after {} candidates in {:.2}s",
            summary.outcome,
            summary.processed,
            summary.elapsed.as_secs_f64()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::sha256_of;

    fn config(keyspace: Keyspace, workers: usize, batch_size: u64) -> SearchConfig {
        SearchConfig {
            workers,
            batch_size,
            report_interval: Duration::from_millis(5),
            keyspace,
            report: false,
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut bad = config(Keyspace::FULL, 0, 10);
        assert!(matches!(Searcher::new(bad.clone()), Err(SearchError::NoWorkers)));
        bad.workers = 2;
        bad.batch_size = 0;
        assert!(matches!(Searcher::new(bad), Err(SearchError::ZeroBatchSize)));
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.keyspace, Keyspace::FULL);
        assert_eq!(config.batch_size, 100_000);
        assert_eq!(config.report_interval, Duration::from_millis(100));
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_record_match_single_winner() {
        let ctx = SearchContext::new(sha256_of("x"), Keyspace::FULL, 10).unwrap();
        assert!(ctx.record_match("1.2.3.4".to_string()));
        assert!(!ctx.record_match("5.6.7.8".to_string()));
        assert_eq!(ctx.found(), Some("1.2.3.4"));
        assert_eq!(ctx.cancellation().reason(), Some(StopReason::Matched));
    }

    #[test]
    fn test_late_interrupt_after_full_scan_is_exhausted() {
        let keyspace = Keyspace::new(0, 999).unwrap();
        let ctx = SearchContext::new(sha256_of("x"), keyspace, 100).unwrap();
        ctx.progress().add(999);
        ctx.interrupt();
        assert_eq!(ctx.outcome(), SearchOutcome::Interrupted);

        // the last flush lands, then the stop reason is already Interrupted
        ctx.progress().add(1);
        assert_eq!(ctx.cancellation().reason(), Some(StopReason::Interrupted));
        assert_eq!(ctx.outcome(), SearchOutcome::Exhausted);
    }

    #[test]
    fn test_match_outranks_stop_reason() {
        let ctx = SearchContext::new(sha256_of("x"), Keyspace::FULL, 10).unwrap();
        ctx.interrupt();
        ctx.record_match("10.0.0.1".to_string());
        assert_eq!(
            ctx.outcome(),
            SearchOutcome::Found {
                ip: "10.0.0.1".to_string()
            }
        );
    }

    #[test]
    fn test_interrupted_search_reports_interrupted() {
        let keyspace = Keyspace::new(0, 50_000).unwrap();
        let searcher = Searcher::new(config(keyspace, 4, 1_000)).unwrap();
        let ctx = searcher.context(sha256_of("0.0.0.9")).unwrap();
        assert!(ctx.interrupt());

        let summary = searcher.run_with_output(&ctx, io::sink()).unwrap();
        assert_eq!(summary.outcome, SearchOutcome::Interrupted);
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.workers.len(), 4);
    }
}
