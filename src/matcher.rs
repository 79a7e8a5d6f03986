use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::{Result, SearchError};

pub const DIGEST_LEN: usize = 32;

/// The SHA-256 digest being searched for.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetDigest([u8; DIGEST_LEN]);

impl TargetDigest {
    pub fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        TargetDigest(bytes)
    }

    pub fn from_hex(hex_digest: &str) -> Result<Self> {
        let trimmed = hex_digest.trim();
        let trimmed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(trimmed)?;
        let bytes: [u8; DIGEST_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SearchError::DigestLength(bytes.len()))?;
        Ok(TargetDigest(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl FromStr for TargetDigest {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        TargetDigest::from_hex(s)
    }
}

impl fmt::Display for TargetDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for TargetDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetDigest({})", hex::encode(self.0))
    }
}

/// SHA-256 of `data`, as a [`TargetDigest`].
pub fn sha256_of(data: impl AsRef<[u8]>) -> TargetDigest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    TargetDigest(hasher.finalize().into())
}

/// Hashes candidates with a reused hasher state and compares them against the target.
pub struct DigestMatcher {
    hasher: Sha256,
    target: TargetDigest,
}

impl DigestMatcher {
    pub fn new(target: TargetDigest) -> Self {
        DigestMatcher {
            hasher: Sha256::new(),
            target,
        }
    }

    #[inline(always)]
    pub fn matches(&mut self, candidate: &[u8]) -> bool {
        self.hasher.update(candidate);
        let digest = self.hasher.finalize_reset();
        digest[..] == self.target.0[..]
    }
}
