//! # Scanner Module
//!
//! Walks a directory tree depth-first and hands eligible entries to a visitor.
//!
//! ## Inclusion Policy
//! - Version-control metadata directories (`.git` by default) are not descended
//! - Symlinks, devices and other non-regular files are skipped
//! - Zero-byte files are skipped unless configured otherwise
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_file_finder::core::scanner::{ScanConfig, WalkControl, Walker};
//!
//! let walker = Walker::new(ScanConfig::default());
//! let stats = walker.walk(&root, &mut |entry: &EntryInfo| {
//!     println!("{}", entry.path.display());
//!     WalkControl::Continue
//! })?;
//! ```

mod filter;
mod walker;

pub use filter::{EntryDecision, EntryFilter};
pub use walker::{ScanConfig, Walker, DEFAULT_VCS_DIR};

use std::path::PathBuf;

/// Immutable description of one visited filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Path of the entry, joined onto the walk root
    pub path: PathBuf,
    /// Distance from the walk root (the root itself is 0)
    pub depth: usize,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Size in bytes (0 for anything but regular files)
    pub size: u64,
    /// Whether the entry is a regular file
    pub is_regular: bool,
}

/// A visitor's answer after seeing an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Keep walking
    Continue,
    /// Do not descend into this directory (no effect on files)
    SkipSubtree,
    /// Stop the walk
    Abort,
}

/// Receives the entries that pass the inclusion policy.
///
/// Closures of type `FnMut(&EntryInfo) -> WalkControl` implement this trait.
pub trait EntryVisitor {
    /// Called once per directory (before its children) and once per eligible file
    fn visit(&mut self, entry: &EntryInfo) -> WalkControl;
}

impl<F> EntryVisitor for F
where
    F: FnMut(&EntryInfo) -> WalkControl,
{
    fn visit(&mut self, entry: &EntryInfo) -> WalkControl {
        self(entry)
    }
}

/// Counters collected during one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories handed to the visitor (including the root)
    pub directories: usize,
    /// Files handed to the visitor
    pub files: usize,
    /// Entries left out by the inclusion policy
    pub skipped: usize,
    /// Entries the directory listing reported errors for
    pub errors: usize,
    /// Whether the visitor stopped the walk early
    pub aborted: bool,
}
