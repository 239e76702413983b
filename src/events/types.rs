//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// All events emitted by a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Traversal and fingerprinting events
    Scan(ScanEvent),
    /// Controller-level events
    Pipeline(PipelineEvent),
}

/// Events emitted while walking and fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Traversal of the resolved root has started
    Started { scan_id: Uuid, root: PathBuf },
    /// Progress update, sent whenever a directory is entered
    Progress(ScanProgress),
    /// A file was fingerprinted and recorded
    FileHashed { path: PathBuf },
    /// An entry was left out by the inclusion policy
    EntrySkipped { path: PathBuf, reason: SkipReason },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Traversal finished (possibly cancelled)
    Completed { summary: ScanSummary },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories entered so far
    pub directories_scanned: usize,
    /// Number of files fingerprinted so far
    pub files_hashed: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Why the inclusion policy left an entry out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// A version-control metadata directory and everything below it
    VcsMetadata,
    /// Symlink, device, fifo or anything else that is not a regular file
    NotRegular,
    /// A zero-byte file
    EmptyFile,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::VcsMetadata => write!(f, "version-control metadata"),
            SkipReason::NotRegular => write!(f, "not a regular file"),
            SkipReason::EmptyFile => write!(f, "empty file"),
        }
    }
}

/// Controller-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// The controller moved to a new state
    StateChanged { state: ScanState },
    /// The scan was cancelled before the walk finished
    Cancelled { scan_id: Uuid },
    /// The scan root was invalid
    Error { message: String },
}

/// Lifecycle of the scan controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    Idle,
    Running,
    Failed,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "Idle"),
            ScanState::Running => write!(f, "Running"),
            ScanState::Failed => write!(f, "Failed"),
        }
    }
}

/// Summary of one completed scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Identifier shared by every event of this scan
    pub scan_id: Uuid,
    /// The resolved root that was walked
    pub root: PathBuf,
    /// Files fingerprinted and recorded
    pub files_hashed: usize,
    /// Distinct contents among the recorded files
    pub distinct_digests: usize,
    /// Classes with two or more members
    pub duplicate_groups: usize,
    /// Directories entered
    pub directories_scanned: usize,
    /// Entries left out by the inclusion policy
    pub skipped: usize,
    /// Listing and fingerprint failures that were skipped over
    pub errors: usize,
    /// Whether the scan was stopped by a cancellation request
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Scan(ScanEvent::Progress(ScanProgress {
            directories_scanned: 10,
            files_hashed: 50,
            current_path: PathBuf::from("/data"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Scan(ScanEvent::Progress(p)) => {
                assert_eq!(p.files_hashed, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn skip_reason_reads_naturally() {
        assert_eq!(SkipReason::EmptyFile.to_string(), "empty file");
        assert_eq!(SkipReason::NotRegular.to_string(), "not a regular file");
    }

    #[test]
    fn scan_summary_is_serializable() {
        let summary = ScanSummary {
            scan_id: Uuid::nil(),
            root: PathBuf::from("/data"),
            files_hashed: 1000,
            distinct_digests: 950,
            duplicate_groups: 40,
            directories_scanned: 12,
            skipped: 3,
            errors: 0,
            cancelled: false,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"files_hashed\":1000"));
    }
}
