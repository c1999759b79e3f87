// src/filesystem/cas.rs

//! Content-addressable storage (CAS) for package bytes
//!
//! Packages are stored by their content hash, so any number of `files`
//! rows (the legacy package, the migrated copy, the content bank copy) can
//! point at the same bytes. Objects are never modified after they are
//! written.

use crate::error::{Error, Result};
use crate::hash::{self, HashAlgorithm};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Byte storage behind the `files` table
///
/// The migration engine only talks to this trait, so tests can put a store
/// with a quota or an I/O fault behind it.
pub trait ContentStore {
    /// Store content and return its hash
    fn store(&self, content: &[u8]) -> Result<String>;

    /// Retrieve content by hash, verifying it
    fn retrieve(&self, hash: &str) -> Result<Vec<u8>>;

    /// Check whether content with the given hash exists
    fn exists(&self, hash: &str) -> bool;
}

/// Content-addressable storage manager
#[derive(Debug, Clone)]
pub struct CasStore {
    /// Root directory for object storage (e.g., /var/lib/migratehvp/objects)
    objects_dir: PathBuf,
    algorithm: HashAlgorithm,
}

impl CasStore {
    /// Create a new CAS store using SHA-256
    pub fn new<P: AsRef<Path>>(objects_dir: P) -> Result<Self> {
        Self::with_algorithm(objects_dir, HashAlgorithm::Sha256)
    }

    /// Create a new CAS store with a specific hash algorithm
    pub fn with_algorithm<P: AsRef<Path>>(objects_dir: P, algorithm: HashAlgorithm) -> Result<Self> {
        let objects_dir = objects_dir.as_ref().to_path_buf();

        if !objects_dir.exists() {
            fs::create_dir_all(&objects_dir)?;
            debug!(
                "Created CAS objects directory: {:?} (algorithm: {})",
                objects_dir, algorithm
            );
        }

        Ok(Self {
            objects_dir,
            algorithm,
        })
    }

    /// Get the objects directory path
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Get the filesystem path for a given hash
    ///
    /// Path format: objects/{first2}/{remaining}
    pub fn hash_to_path(&self, hash: &str) -> PathBuf {
        if hash.len() < 2 {
            return self.objects_dir.join(hash);
        }

        let (prefix, suffix) = hash.split_at(2);
        self.objects_dir.join(prefix).join(suffix)
    }

    /// Compute hash of content using this store's algorithm
    pub fn compute_hash(&self, content: &[u8]) -> String {
        hash::hash_bytes(self.algorithm, content)
    }
}

impl ContentStore for CasStore {
    /// Content is written to a temp file and renamed into place. Storing bytes
    /// that already exist is a no-op.
    fn store(&self, content: &[u8]) -> Result<String> {
        let hash = self.compute_hash(content);
        let path = self.hash_to_path(&hash);

        if path.exists() {
            debug!("Content already in CAS: {}", hash);
            return Ok(hash);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        debug!("Stored content in CAS: {} ({} bytes)", hash, content.len());
        Ok(hash)
    }

    fn retrieve(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.hash_to_path(hash);

        if !path.exists() {
            return Err(Error::NotFound(format!("Content not found in CAS: {hash}")));
        }

        let content = fs::read(&path)?;

        if !hash::verify_bytes(&content, hash, self.algorithm) {
            return Err(Error::IoError(format!(
                "Hash mismatch for CAS object {}: expected {}, got {}",
                path.display(),
                hash,
                self.compute_hash(&content)
            )));
        }

        debug!("Retrieved content from CAS: {} ({} bytes)", hash, content.len());
        Ok(content)
    }

    fn exists(&self, hash: &str) -> bool {
        self.hash_to_path(hash).exists()
    }
}
