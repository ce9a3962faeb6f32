//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used for
//! content integrity verification between the two trees. Files are read in
//! fixed-size chunks so arbitrarily large files never occupy memory whole.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Chunk size for streaming reads
const CHUNK_SIZE: usize = 8192;

/// Hashes file contents into the canonical checksum format.
///
/// The trait is the seam between the reconciliation engine and the digest
/// implementation; tests substitute counting or failing hashers.
pub trait FileHasher: Send + Sync {
    /// Compute the checksum of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn hash_file(&self, path: &Path) -> std::io::Result<String>;
}

/// Production hasher: streaming SHA-256 over 8 KiB chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingSha256;

impl FileHasher for StreamingSha256 {
    fn hash_file(&self, path: &Path) -> std::io::Result<String> {
        hash_file_streaming(path)
    }
}

/// Compute the SHA-256 checksum of a file's contents in streaming fashion.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a read fails partway
/// through (permission change, file disappearing mid-read).
pub fn hash_file_streaming(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute the SHA-256 checksum of in-memory content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}
