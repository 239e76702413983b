//! # Registry Module
//!
//! Groups fingerprinted files into equivalence classes by digest.
//!
//! ## How It Works
//! 1. Each fingerprinted file is recorded under its digest
//! 2. Classes keep their members in discovery order
//! 3. Classes themselves are kept in the order their first member was found
//! 4. Only classes with two or more members are reported

mod classes;

pub use classes::{EquivalenceClass, Registry};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A class of files sharing one digest, as reported to consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Hex form of the shared digest
    pub digest: String,
    /// Member paths in discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of files in the group
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Number of redundant copies (all but one)
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Header line introducing the group in the result feed
    pub fn header(&self) -> String {
        format!(
            "------------- {:4} files have identical content ---------",
            self.count()
        )
    }
}
