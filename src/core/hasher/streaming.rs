//! SHA-1 content hasher that streams files in fixed-size chunks.

use super::{ContentHasher, Digest, DIGEST_LEN};
use crate::error::HashError;
use sha1::{Digest as _, Sha1};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Default read size for streaming file content
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Streams file content through SHA-1.
#[derive(Debug, Clone)]
pub struct Sha1Hasher {
    chunk_size: usize,
}

impl Sha1Hasher {
    /// Create a hasher with the default chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a hasher that reads `chunk_size` bytes at a time (minimum 1)
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Hash everything `reader` yields until EOF.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Digest> {
        let mut hasher = Sha1::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(Digest::from_bytes(bytes))
    }
}

impl Default for Sha1Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Sha1Hasher {
    fn fingerprint(&self, path: &Path) -> Result<Digest, HashError> {
        let io_error = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        self.digest_reader(file).map_err(io_error)
    }
}
