use std::fmt;
use std::net::Ipv4Addr;

use log::debug;

use crate::error::{Result, SearchError};

/// Inclusive range of IPv4 addresses assigned to a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRange {
    pub start: u32,
    pub end: u32,
}

impl WorkRange {
    pub fn len(&self) -> u64 {
        self.end as u64 - self.start as u64 + 1
    }

    pub fn contains(&self, ip: u32) -> bool {
        (self.start..=self.end).contains(&ip)
    }
}

impl fmt::Display for WorkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            Ipv4Addr::from(self.start),
            Ipv4Addr::from(self.end)
        )
    }
}

/// The set of addresses a search enumerates. Normally the whole IPv4 space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyspace {
    start: u32,
    end: u32,
}

impl Keyspace {
    pub const FULL: Keyspace = Keyspace {
        start: 0,
        end: u32::MAX,
    };

    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start > end {
            return Err(SearchError::InvertedKeyspace {
                start: Ipv4Addr::from(start),
                end: Ipv4Addr::from(end),
            });
        }
        Ok(Keyspace { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of candidates in the keyspace (2^32 for [`Keyspace::FULL`]).
    pub fn total(&self) -> u64 {
        self.end as u64 - self.start as u64 + 1
    }

    /// Splits the keyspace into `workers` contiguous ranges of `total / workers`
    /// addresses each. The last range also takes the remainder of the division.
    ///
    /// A worker count larger than the keyspace is clamped so that no range is empty.
    pub fn partition(&self, workers: usize) -> Result<Vec<WorkRange>> {
        if workers == 0 {
            return Err(SearchError::NoWorkers);
        }

        let total = self.total();
        let workers = (workers as u64).min(total);
        let step = total / workers;

        let ranges: Vec<WorkRange> = (0..workers)
            .map(|i| {
                let start = self.start as u64 + i * step;
                let end = if i == workers - 1 {
                    self.end as u64
                } else {
                    start + step - 1
                };
                WorkRange {
                    start: start as u32,
                    end: end as u32,
                }
            })
            .collect();

        debug!(
            "partitioned {} into {} ranges of {} (last: {})",
            self,
            ranges.len(),
            step,
            ranges.last().map_or(0, WorkRange::len)
        );

        Ok(ranges)
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        Keyspace::FULL
    }
}

impl fmt::Display for Keyspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            Ipv4Addr::from(self.start),
            Ipv4Addr::from(self.end)
        )
    }
}
