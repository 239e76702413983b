//! # Reporter Module
//!
//! Keeps the human-readable result feed that front ends display while a
//! scan runs.
//!
//! ## Consistency
//! The feed is stored behind an `Arc` and replaced wholesale on every refresh,
//! so a reader copying it out never observes a half-written listing. Writers
//! hold the lock only for the pointer swap.

mod export;

pub use export::{export_results, export_results_at, results_file_name, write_results};

use super::registry::Registry;
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};

/// First line of the feed shown when an error ends a scan
pub const ERROR_LINE: &str = "An error occurred:";

const HELP: &str = "Choose a directory (relative to the base directory) and start a scan \
to list files with identical content.
Results are refreshed while the scan runs; save them to write a results-<timestamp>.txt file.";

/// Program banner and usage help shown before the first scan
pub fn banner() -> Vec<String> {
    let mut lines = vec![format!("dupfind {}", env!("CARGO_PKG_VERSION"))];
    lines.extend(HELP.lines().map(str::to_string));
    lines
}

/// Trailing line of every refreshed feed
pub fn summary_line(registry: &Registry) -> String {
    format!(
        "{} distinct contents among {} files",
        registry.distinct_digests(),
        registry.total_files()
    )
}

/// Lock-guarded snapshot of the latest result listing
#[derive(Debug, Default)]
pub struct ProgressReporter {
    feed: RwLock<Arc<Vec<String>>>,
}

impl ProgressReporter {
    /// Create a reporter with an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reporter whose feed starts with the program banner
    pub fn with_banner() -> Self {
        Self {
            feed: RwLock::new(Arc::new(banner())),
        }
    }

    /// Recompute the feed from the registry and swap it in
    pub fn refresh(&self, registry: &Registry) {
        let mut lines = registry.render_interesting();
        lines.push(summary_line(registry));
        self.replace(lines);
    }

    /// Copy of the current feed, in display order
    pub fn read(&self) -> Vec<String> {
        self.snapshot().as_ref().clone()
    }

    /// Shared handle to the current feed without copying the lines
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        let feed = self.feed.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*feed)
    }

    /// Empty the feed
    pub fn reset(&self) {
        self.replace(Vec::new());
    }

    /// Append the error banner line followed by the error message
    pub fn push_error(&self, error: &dyn Display) {
        self.append([ERROR_LINE.to_string(), error.to_string()]);
    }

    /// Append one status line
    pub fn push_status(&self, line: impl Into<String>) {
        self.append([line.into()]);
    }

    fn replace(&self, lines: Vec<String>) {
        let lines = Arc::new(lines);
        let mut feed = self.feed.write().unwrap_or_else(PoisonError::into_inner);
        *feed = lines;
    }

    fn append<const N: usize>(&self, extra: [String; N]) {
        let mut feed = self.feed.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut *feed).extend(extra);
    }
}
