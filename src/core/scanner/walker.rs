//! Directory walking implementation using walkdir.

use super::filter::{EntryDecision, EntryFilter};
use super::{EntryInfo, EntryVisitor, WalkControl, WalkStats};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory name skipped as version-control metadata by default
pub const DEFAULT_VCS_DIR: &str = ".git";

/// Configuration for one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Skip zero-byte files
    pub ignore_empty_files: bool,
    /// Skip version-control metadata directories and their subtrees
    pub ignore_vcs_metadata: bool,
    /// Directory names treated as version-control metadata
    pub vcs_dir_names: Vec<String>,
    /// Visit siblings in file-name order instead of listing order
    pub sort_entries: bool,
    /// Recompute the result feed after this many hashed files (0 acts as 1)
    pub refresh_every: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_empty_files: true,
            ignore_vcs_metadata: true,
            vcs_dir_names: vec![DEFAULT_VCS_DIR.to_string()],
            sort_entries: false,
            refresh_every: 1,
        }
    }
}

/// Depth-first, pre-order walker built on the walkdir crate
pub struct Walker {
    config: ScanConfig,
    filter: EntryFilter,
}

impl Walker {
    /// Create a new walker with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = EntryFilter::new(&config);
        Self { config, filter }
    }

    /// Walk `root` without event reporting
    pub fn walk<V: EntryVisitor>(
        &self,
        root: &Path,
        visitor: &mut V,
    ) -> Result<WalkStats, ScanError> {
        self.walk_with_events(root, visitor, &null_sender())
    }

    /// Walk `root`, reporting skips and per-entry errors via events.
    ///
    /// Only a failure to read the root itself is returned as an error;
    /// anything below it is logged, counted, and walked past.
    pub fn walk_with_events<V: EntryVisitor>(
        &self,
        root: &Path,
        visitor: &mut V,
        events: &EventSender,
    ) -> Result<WalkStats, ScanError> {
        let mut stats = WalkStats::default();

        let mut walker = WalkDir::new(root).follow_links(false);
        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }
        let mut entries = walker.into_iter();

        while let Some(entry_result) = entries.next() {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());

                    if e.depth() == 0 {
                        return Err(match e.into_io_error() {
                            Some(source) => ScanError::from_root_io(path, source),
                            None => ScanError::RootNotFound { path },
                        });
                    }

                    self.report_entry_error(path, e.to_string(), &mut stats, events);
                    continue;
                }
            };

            let file_type = entry.file_type();
            let is_regular = file_type.is_file();
            let size = if is_regular {
                match entry.metadata() {
                    Ok(metadata) => metadata.len(),
                    Err(e) => {
                        let path = entry.path().to_path_buf();
                        self.report_entry_error(path, e.to_string(), &mut stats, events);
                        continue;
                    }
                }
            } else {
                0
            };

            let info = EntryInfo {
                path: entry.path().to_path_buf(),
                depth: entry.depth(),
                is_dir: file_type.is_dir(),
                size,
                is_regular,
            };

            match self.filter.classify(&info) {
                EntryDecision::Skip(reason) => {
                    debug!(path = %info.path.display(), %reason, "Skipping entry");
                    events.send(Event::Scan(ScanEvent::EntrySkipped {
                        path: info.path,
                        reason,
                    }));
                    stats.skipped += 1;
                    if info.is_dir {
                        entries.skip_current_dir();
                    }
                    continue;
                }
                EntryDecision::Descend => stats.directories += 1,
                EntryDecision::Fingerprint => stats.files += 1,
            }

            match visitor.visit(&info) {
                WalkControl::Continue => {}
                WalkControl::SkipSubtree => {
                    if info.is_dir {
                        entries.skip_current_dir();
                    }
                }
                WalkControl::Abort => {
                    stats.aborted = true;
                    break;
                }
            }
        }

        Ok(stats)
    }

    fn report_entry_error(
        &self,
        path: PathBuf,
        message: String,
        stats: &mut WalkStats,
        events: &EventSender,
    ) {
        let error = ScanError::ReadEntry {
            path: path.clone(),
            message,
        };
        warn!(error = %error, "Directory listing reported an error");

        events.send(Event::Scan(ScanEvent::Error {
            path,
            message: error.to_string(),
        }));
        stats.errors += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventChannel, SkipReason};
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn collect_files(walker: &Walker, root: &Path) -> (Vec<PathBuf>, WalkStats) {
        let mut files = Vec::new();
        let stats = walker
            .walk(root, &mut |entry: &EntryInfo| {
                if !entry.is_dir {
                    files.push(entry.path.clone());
                }
                WalkControl::Continue
            })
            .unwrap();
        (files, stats)
    }

    #[test]
    fn walk_empty_directory_visits_only_root() {
        let temp_dir = TempDir::new().unwrap();
        let walker = Walker::new(ScanConfig::default());

        let (files, stats) = collect_files(&walker, temp_dir.path());

        assert!(files.is_empty());
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn walk_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "top.txt", "a");
        write_file(temp_dir.path(), "one/two/deep.txt", "b");

        let walker = Walker::new(ScanConfig::default());
        let (files, stats) = collect_files(&walker, temp_dir.path());

        assert_eq!(files.len(), 2);
        assert_eq!(stats.directories, 3);
    }

    #[test]
    fn walk_is_pre_order_when_sorted() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "b/inner.txt", "x");
        write_file(temp_dir.path(), "a.txt", "x");
        write_file(temp_dir.path(), "c.txt", "x");

        let walker = Walker::new(ScanConfig {
            sort_entries: true,
            ..Default::default()
        });
        let mut seen = Vec::new();
        walker
            .walk(temp_dir.path(), &mut |entry: &EntryInfo| {
                seen.push(entry.path.strip_prefix(temp_dir.path()).unwrap().to_path_buf());
                WalkControl::Continue
            })
            .unwrap();

        let expected: Vec<PathBuf> = ["", "a.txt", "b", "b/inner.txt", "c.txt"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn vcs_directory_is_not_descended() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "a.txt", "hello");
        write_file(temp_dir.path(), ".git/d.txt", "hello");

        let walker = Walker::new(ScanConfig::default());
        let (files, stats) = collect_files(&walker, temp_dir.path());

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.txt"));
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn vcs_directory_is_descended_when_allowed() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "a.txt", "hello");
        write_file(temp_dir.path(), ".git/d.txt", "hello");

        let walker = Walker::new(ScanConfig {
            ignore_vcs_metadata: false,
            ..Default::default()
        });
        let (files, _) = collect_files(&walker, temp_dir.path());

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn empty_files_are_skipped_with_event() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "empty.txt", "");
        write_file(temp_dir.path(), "full.txt", "data");

        let (sender, receiver) = EventChannel::new();
        let walker = Walker::new(ScanConfig::default());
        let mut files = Vec::new();
        walker
            .walk_with_events(
                temp_dir.path(),
                &mut |entry: &EntryInfo| {
                    if !entry.is_dir {
                        files.push(entry.path.clone());
                    }
                    WalkControl::Continue
                },
                &sender,
            )
            .unwrap();
        drop(sender);

        assert_eq!(files.len(), 1);
        let skipped: Vec<_> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Scan(ScanEvent::EntrySkipped { reason, .. }) => Some(reason),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, vec![SkipReason::EmptyFile]);
    }

    #[test]
    fn entry_vanishing_mid_walk_is_counted_and_walked_past() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "a.txt", "a");
        let doomed = write_file(temp_dir.path(), "b.txt", "b");
        write_file(temp_dir.path(), "c.txt", "c");

        // Sorting reads the whole listing before the first entry is visited
        let walker = Walker::new(ScanConfig {
            sort_entries: true,
            ..Default::default()
        });
        let (sender, receiver) = EventChannel::new();
        let mut files = Vec::new();
        let stats = walker
            .walk_with_events(
                temp_dir.path(),
                &mut |entry: &EntryInfo| {
                    if entry.path.ends_with("a.txt") {
                        fs::remove_file(&doomed).unwrap();
                    }
                    if !entry.is_dir {
                        files.push(entry.path.clone());
                    }
                    WalkControl::Continue
                },
                &sender,
            )
            .unwrap();
        drop(sender);

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.files, 2);
        assert!(!stats.aborted);
        assert!(files.iter().any(|p| p.ends_with("c.txt")));
        assert!(!files.iter().any(|p| p.ends_with("b.txt")));

        let errors: Vec<PathBuf> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Scan(ScanEvent::Error { path, .. }) => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(errors, vec![doomed]);
    }

    #[test]
    fn visitor_can_skip_a_subtree() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "keep/a.txt", "a");
        write_file(temp_dir.path(), "drop/b.txt", "b");

        let walker = Walker::new(ScanConfig::default());
        let mut files = Vec::new();
        walker
            .walk(temp_dir.path(), &mut |entry: &EntryInfo| {
                if entry.is_dir && entry.path.ends_with("drop") {
                    return WalkControl::SkipSubtree;
                }
                if !entry.is_dir {
                    files.push(entry.path.clone());
                }
                WalkControl::Continue
            })
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.txt"));
    }

    #[test]
    fn visitor_can_abort() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            write_file(temp_dir.path(), &format!("f{}.txt", i), "x");
        }

        let walker = Walker::new(ScanConfig::default());
        let mut files = 0;
        let stats = walker
            .walk(temp_dir.path(), &mut |entry: &EntryInfo| {
                if entry.is_dir {
                    return WalkControl::Continue;
                }
                files += 1;
                if files == 2 {
                    WalkControl::Abort
                } else {
                    WalkControl::Continue
                }
            })
            .unwrap();

        assert!(stats.aborted);
        assert_eq!(files, 2);
    }

    #[test]
    fn nonexistent_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let walker = Walker::new(ScanConfig::default());
        let result = walker.walk(&missing, &mut |_: &EntryInfo| WalkControl::Continue);

        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        let target = write_file(temp_dir.path(), "target.txt", "hello");
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("nowhere"),
            temp_dir.path().join("broken"),
        )
        .unwrap();

        let walker = Walker::new(ScanConfig::default());
        let (files, stats) = collect_files(&walker, temp_dir.path());

        assert_eq!(files, vec![target]);
        assert_eq!(stats.skipped, 2);
    }
}
