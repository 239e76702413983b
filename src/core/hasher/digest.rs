//! Fixed-size content digest used as the registry key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a digest in bytes (160 bits)
pub const DIGEST_LEN: usize = 20;

/// A 160-bit content digest.
///
/// Equal digests mean equal content for the purposes of a scan.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Get the digest as a lowercase hexadecimal string
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_forty_lowercase_chars() {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes[0] = 0xAB;
        bytes[19] = 0x01;
        let hex = Digest::from_bytes(bytes).to_hex();

        assert_eq!(hex.len(), 40);
        assert!(hex.starts_with("ab"));
        assert!(hex.ends_with("01"));
    }

    #[test]
    fn ordering_follows_bytes() {
        let low = Digest::from_bytes([0u8; DIGEST_LEN]);
        let high = Digest::from_bytes([1u8; DIGEST_LEN]);
        assert!(low < high);
    }
}
