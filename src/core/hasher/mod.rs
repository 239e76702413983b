//! # Hasher Module
//!
//! Computes content digests for regular files.
//!
//! ## How It Works
//! 1. Open the file
//! 2. Stream it through SHA-1 in fixed-size chunks (never the whole file at once)
//! 3. Return the 160-bit digest
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_file_finder::core::hasher::{ContentHasher, Sha1Hasher};
//!
//! let digest = Sha1Hasher::new().fingerprint(&path)?;
//! println!("{}", digest);
//! ```

mod digest;
mod streaming;

pub use digest::{Digest, DIGEST_LEN};
pub use streaming::{Sha1Hasher, DEFAULT_CHUNK_SIZE};

use crate::error::HashError;
use std::path::Path;

/// Computes a digest of a file's full content.
///
/// Implement this trait to substitute the hasher (e.g., for testing).
pub trait ContentHasher: Send + Sync {
    /// Fingerprint the regular file at `path`.
    ///
    /// Fails if the file cannot be opened or a read fails mid-stream.
    fn fingerprint(&self, path: &Path) -> Result<Digest, HashError>;
}
