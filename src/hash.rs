// src/hash.rs

//! Content hashing for the package object store
//!
//! Package bytes are addressed by their hash. Two algorithms are available:
//! - **SHA-256** (default): matches the content hashes most sites already keep
//! - **XXH128**: fast non-cryptographic hash for stores that only need dedup

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use xxhash_rust::xxh3::xxh3_128;

/// Hash algorithm used to address stored packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Xxh128,
}

impl HashAlgorithm {
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Xxh128 => "xxh128",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compute the hex digest of a byte slice
pub fn hash_bytes(algorithm: HashAlgorithm, data: &[u8]) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(data);
            format!("{:x}", hasher.finalize())
        }
        HashAlgorithm::Xxh128 => format!("{:032x}", xxh3_128(data)),
    }
}

/// Check that `data` hashes to `expected`
pub fn verify_bytes(data: &[u8], expected: &str, algorithm: HashAlgorithm) -> bool {
    hash_bytes(algorithm, data) == expected.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hash() {
        let hash = hash_bytes(HashAlgorithm::Sha256, b"Hello, World!");
        assert_eq!(
            hash,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_xxh128_length() {
        let hash = hash_bytes(HashAlgorithm::Xxh128, b"Hello, World!");
        assert_eq!(hash.len(), 32);
    }

    #[test]
    fn test_verify_bytes() {
        let data = b"package bytes";
        let hash = hash_bytes(HashAlgorithm::Sha256, data);
        assert!(verify_bytes(data, &hash.to_uppercase(), HashAlgorithm::Sha256));
        assert!(!verify_bytes(b"other", &hash, HashAlgorithm::Sha256));
    }
}
