//! Exhaustive SHA-256 preimage search over the IPv4 address space.
//!
//! Every address in a [`Keyspace`] is rendered in dotted-decimal form,
//! hashed, and compared with a [`TargetDigest`]. The keyspace is split into
//! contiguous ranges, one per worker thread, and the first worker to hit the
//! target stops everybody else through a shared [`CancellationFlag`].

pub mod benchmark;
pub mod candidate;
pub mod error;
pub mod keyspace;
pub mod matcher;
pub mod progress;
pub mod reporter;
pub mod search;
pub mod worker;

pub use error::{Result, SearchError};
pub use keyspace::{Keyspace, WorkRange};
pub use matcher::{DigestMatcher, TargetDigest};
pub use progress::{CancellationFlag, ProgressCounter, ProgressSnapshot, StopReason};
pub use search::{SearchConfig, SearchContext, SearchOutcome, SearchSummary, Searcher};
pub use worker::WorkerReport;

/// Number of non-matching candidates a worker tests between counter flushes.
pub const DEFAULT_BATCH_SIZE: u64 = 100_000;
