//! Inclusion policy for the scanner.

use super::{EntryInfo, ScanConfig};
use crate::events::SkipReason;
use std::collections::HashSet;

/// What the walker should do with one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    /// A directory to visit and descend into
    Descend,
    /// A regular file to fingerprint
    Fingerprint,
    /// Leave the entry out (and its subtree, for directories)
    Skip(SkipReason),
}

/// Decides which entries take part in a scan
pub struct EntryFilter {
    ignore_empty_files: bool,
    ignore_vcs_metadata: bool,
    vcs_dir_names: HashSet<String>,
}

impl EntryFilter {
    /// Build the policy from a scan configuration
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            ignore_empty_files: config.ignore_empty_files,
            ignore_vcs_metadata: config.ignore_vcs_metadata,
            vcs_dir_names: config.vcs_dir_names.iter().cloned().collect(),
        }
    }

    /// Classify an entry. Rules apply in order: VCS metadata directories,
    /// other directories, non-regular files, empty files, everything else.
    ///
    /// The walk root (depth 0) is never skipped as VCS metadata.
    pub fn classify(&self, entry: &EntryInfo) -> EntryDecision {
        if entry.is_dir {
            if entry.depth > 0 && self.ignore_vcs_metadata && self.is_vcs_dir(entry) {
                return EntryDecision::Skip(SkipReason::VcsMetadata);
            }
            return EntryDecision::Descend;
        }

        if !entry.is_regular {
            return EntryDecision::Skip(SkipReason::NotRegular);
        }

        if entry.size == 0 && self.ignore_empty_files {
            return EntryDecision::Skip(SkipReason::EmptyFile);
        }

        EntryDecision::Fingerprint
    }

    fn is_vcs_dir(&self, entry: &EntryInfo) -> bool {
        entry
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.vcs_dir_names.contains(name))
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}
