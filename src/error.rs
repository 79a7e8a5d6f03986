use std::net::Ipv4Addr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid hex digest")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("a SHA-256 digest is 32 bytes, got {0}")]
    DigestLength(usize),

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("batch size must be greater than zero")]
    ZeroBatchSize,

    #[error("keyspace start {start} is after end {end}")]
    InvertedKeyspace { start: Ipv4Addr, end: Ipv4Addr },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn reporter thread: {0}")]
    Reporter(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_hex_error_is_reported_once() {
        let err = SearchError::from(hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 });
        assert_eq!(err.to_string(), "invalid hex digest");
        let source = err.source().unwrap().to_string();
        assert!(source.contains("'z'"));
    }

    #[test]
    fn test_inverted_keyspace_shows_addresses() {
        let err = SearchError::InvertedKeyspace {
            start: Ipv4Addr::new(10, 0, 0, 5),
            end: Ipv4Addr::new(10, 0, 0, 1),
        };
        assert_eq!(err.to_string(), "keyspace start 10.0.0.5 is after end 10.0.0.1");
    }
}
