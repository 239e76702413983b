//! # Core Module
//!
//! The GUI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `hasher` - Computes content digests of files
//! - `scanner` - Walks directory trees and applies the inclusion policy
//! - `registry` - Groups files by digest
//! - `reporter` - Keeps the live, human-readable result feed
//! - `pipeline` - Orchestrates a scan and guards against concurrent runs

pub mod hasher;
pub mod pipeline;
pub mod registry;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use hasher::{ContentHasher, Digest, Sha1Hasher};
pub use pipeline::{CancellationToken, ScanController, ScanHandle};
pub use registry::{DuplicateGroup, Registry};
pub use reporter::ProgressReporter;
pub use scanner::{EntryInfo, EntryVisitor, ScanConfig, WalkControl, Walker};
