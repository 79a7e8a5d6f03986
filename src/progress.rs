use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

/// Cumulative count of candidates tested by all workers.
///
/// Workers flush in batches, so a snapshot can lag behind the real amount of
/// work by up to one batch per worker.
pub struct ProgressCounter {
    processed: AtomicU64,
    total: u64,
    started: Instant,
}

impl ProgressCounter {
    pub fn new(total: u64) -> Self {
        ProgressCounter {
            processed: AtomicU64::new(0),
            total,
            started: Instant::now(),
        }
    }

    /// Adds `count` and returns the new cumulative value.
    #[inline]
    pub fn add(&self, count: u64) -> u64 {
        self.processed.fetch_add(count, Ordering::SeqCst) + count
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed: self.processed(),
            total: self.total,
            elapsed: self.elapsed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub processed: u64,
    pub total: u64,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Candidates per second, or 0 before any time has passed.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.processed as f64 / secs
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        100.0 * self.processed as f64 / self.total as f64
    }

    /// Seconds left at the current rate, or 0 while the rate is still 0.
    pub fn eta_secs(&self) -> f64 {
        let rate = self.rate();
        if rate == 0.0 {
            0.0
        } else {
            self.total.saturating_sub(self.processed) as f64 / rate
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StopReason {
    Matched = 1,
    Exhausted = 2,
    Interrupted = 3,
}

const RUNNING: u8 = 0;

/// Set-once stop signal shared by the workers and the reporter.
#[derive(Default)]
pub struct CancellationFlag {
    state: AtomicU8,
}

impl CancellationFlag {
    pub fn new() -> Self {
        CancellationFlag {
            state: AtomicU8::new(RUNNING),
        }
    }

    /// Raises the flag. Returns true only for the call that actually set it;
    /// the first reason sticks and is never overwritten.
    pub fn cancel(&self, reason: StopReason) -> bool {
        self.state
            .compare_exchange(RUNNING, reason as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Relaxed) != RUNNING
    }

    pub fn reason(&self) -> Option<StopReason> {
        match self.state.load(Ordering::SeqCst) {
            1 => Some(StopReason::Matched),
            2 => Some(StopReason::Exhausted),
            3 => Some(StopReason::Interrupted),
            _ => None,
        }
    }
}
