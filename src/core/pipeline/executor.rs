//! Scan controller implementation.

use super::handle::{CancellationToken, ScanHandle};
use crate::core::hasher::{ContentHasher, Sha1Hasher};
use crate::core::registry::{DuplicateGroup, Registry};
use crate::core::reporter::ProgressReporter;
use crate::core::scanner::{EntryInfo, EntryVisitor, ScanConfig, WalkControl, Walker};
use crate::error::ScanError;
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, ScanEvent, ScanProgress, ScanState,
    ScanSummary,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Status line appended to the feed when a scan is cancelled
pub const CANCELLED_LINE: &str = "Scan cancelled";

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const FAILED: u8 = 2;

/// Join the base directory and the requested subdirectory.
///
/// An absolute `subdir` replaces `base`; an empty one means `base` itself.
pub fn resolve_root(base: &Path, subdir: &str) -> PathBuf {
    if subdir.is_empty() {
        base.to_path_buf()
    } else {
        base.join(subdir)
    }
}

/// Builder for scan controllers
pub struct ScanControllerBuilder {
    config: ScanConfig,
    hasher: Option<Box<dyn ContentHasher>>,
    events: Option<EventSender>,
    banner: bool,
}

impl ScanControllerBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
            hasher: None,
            events: None,
            banner: false,
        }
    }

    /// Replace the whole scan configuration
    pub fn config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip zero-byte files
    pub fn ignore_empty_files(mut self, ignore: bool) -> Self {
        self.config.ignore_empty_files = ignore;
        self
    }

    /// Skip version-control metadata directories
    pub fn ignore_vcs_metadata(mut self, ignore: bool) -> Self {
        self.config.ignore_vcs_metadata = ignore;
        self
    }

    /// Directory names treated as version-control metadata
    pub fn vcs_dir_names(mut self, names: Vec<String>) -> Self {
        self.config.vcs_dir_names = names;
        self
    }

    /// Visit siblings in file-name order
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.config.sort_entries = sort;
        self
    }

    /// Refresh the feed after this many recorded files
    pub fn refresh_every(mut self, files: usize) -> Self {
        self.config.refresh_every = files;
        self
    }

    /// Use a different content hasher
    pub fn hasher(mut self, hasher: Box<dyn ContentHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Send progress events to this channel
    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Start with the program banner in the feed
    pub fn with_banner(mut self) -> Self {
        self.banner = true;
        self
    }

    /// Build the controller
    pub fn build(self) -> ScanController {
        let reporter = if self.banner {
            ProgressReporter::with_banner()
        } else {
            ProgressReporter::new()
        };

        ScanController {
            shared: Arc::new(Shared {
                config: self.config,
                hasher: self.hasher.unwrap_or_else(|| Box::new(Sha1Hasher::new())),
                registry: Mutex::new(Registry::new()),
                reporter,
                state: AtomicU8::new(IDLE),
                events: self.events.unwrap_or_else(null_sender),
            }),
        }
    }
}

impl Default for ScanControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct Shared {
    config: ScanConfig,
    hasher: Box<dyn ContentHasher>,
    registry: Mutex<Registry>,
    reporter: ProgressReporter,
    state: AtomicU8,
    events: EventSender,
}

impl Shared {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ScanState) {
        let raw = match state {
            ScanState::Idle => IDLE,
            ScanState::Running => RUNNING,
            ScanState::Failed => FAILED,
        };
        self.state.store(raw, Ordering::SeqCst);
        self.events
            .send(Event::Pipeline(PipelineEvent::StateChanged { state }));
    }
}

/// Holds the controller in `Running`; dropping it returns to `Idle`.
struct RunGuard {
    shared: Arc<Shared>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.shared.set_state(ScanState::Idle);
    }
}

/// Runs duplicate scans and exposes their live results.
///
/// Cloning is cheap; clones share the same registry, feed and state.
#[derive(Clone)]
pub struct ScanController {
    shared: Arc<Shared>,
}

impl ScanController {
    /// Create a new controller builder
    pub fn builder() -> ScanControllerBuilder {
        ScanControllerBuilder::new()
    }

    /// Controller with the default configuration
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The configuration every scan of this controller uses
    pub fn config(&self) -> &ScanConfig {
        &self.shared.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> ScanState {
        match self.shared.state.load(Ordering::SeqCst) {
            RUNNING => ScanState::Running,
            FAILED => ScanState::Failed,
            _ => ScanState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == ScanState::Running
    }

    /// Current result feed lines, in display order
    pub fn results(&self) -> Vec<String> {
        self.shared.reporter.read()
    }

    /// Interesting classes recorded so far
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        self.shared.registry().snapshot_interesting()
    }

    /// Scan `base/subdir` on the calling thread.
    ///
    /// Fails with [`ScanError::AlreadyRunning`] if another scan is active, or
    /// with a root error if the resolved root cannot be read. Problems with
    /// individual entries are logged and skipped.
    pub fn process(&self, base: &Path, subdir: &str) -> Result<ScanSummary, ScanError> {
        let guard = self.try_begin()?;
        let root = resolve_root(base, subdir);
        let outcome = run_scan(&guard.shared, &root, &CancellationToken::new(), Uuid::new_v4());
        drop(guard);
        outcome
    }

    /// Scan `base/subdir` on a background thread.
    ///
    /// The registry and feed are already cleared when this returns. Fails
    /// with [`ScanError::AlreadyRunning`] without side effects if another
    /// scan is active.
    pub fn start(&self, base: &Path, subdir: &str) -> Result<ScanHandle, ScanError> {
        let guard = self.try_begin()?;
        let root = resolve_root(base, subdir);
        let cancel = CancellationToken::new();
        let scan_id = Uuid::new_v4();

        let thread = {
            let root = root.clone();
            let cancel = cancel.clone();
            thread::Builder::new()
                .name("dupfind-scan".to_string())
                .spawn(move || {
                    let outcome = run_scan(&guard.shared, &root, &cancel, scan_id);
                    drop(guard);
                    outcome
                })
                .map_err(ScanError::Spawn)?
        };

        Ok(ScanHandle {
            scan_id,
            root,
            cancel,
            thread,
        })
    }

    fn try_begin(&self) -> Result<RunGuard, ScanError> {
        let acquired = self
            .shared
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if !acquired {
            warn!("Rejecting scan request: a scan is already running");
            return Err(ScanError::AlreadyRunning);
        }

        // Cleared before start returns so callers never read the previous scan
        self.shared.registry().clear();
        self.shared.reporter.reset();

        self.shared
            .events
            .send(Event::Pipeline(PipelineEvent::StateChanged {
                state: ScanState::Running,
            }));
        Ok(RunGuard {
            shared: Arc::clone(&self.shared),
        })
    }
}

impl Default for ScanController {
    fn default() -> Self {
        Self::new()
    }
}

fn run_scan(
    shared: &Shared,
    root: &Path,
    cancel: &CancellationToken,
    scan_id: Uuid,
) -> Result<ScanSummary, ScanError> {
    let start_time = Instant::now();

    info!(%scan_id, root = %root.display(), "Starting scan");

    if let Err(source) = fs::metadata(root) {
        return Err(fail(shared, ScanError::from_root_io(root.to_path_buf(), source)));
    }

    shared.events.send(Event::Scan(ScanEvent::Started {
        scan_id,
        root: root.to_path_buf(),
    }));

    let walker = Walker::new(shared.config.clone());
    let mut visitor = ScanVisitor::new(shared, cancel);
    let stats = match walker.walk_with_events(root, &mut visitor, &shared.events) {
        Ok(stats) => stats,
        Err(e) => return Err(fail(shared, e)),
    };

    let (distinct_digests, duplicate_groups) = {
        let registry = shared.registry();
        shared.reporter.refresh(&registry);
        (registry.distinct_digests(), registry.snapshot_interesting().len())
    };

    if stats.aborted {
        info!(%scan_id, "Scan cancelled");
        shared.reporter.push_status(CANCELLED_LINE);
        shared
            .events
            .send(Event::Pipeline(PipelineEvent::Cancelled { scan_id }));
    }

    let summary = ScanSummary {
        scan_id,
        root: root.to_path_buf(),
        files_hashed: visitor.files_hashed,
        distinct_digests,
        duplicate_groups,
        directories_scanned: stats.directories,
        skipped: stats.skipped,
        errors: stats.errors + visitor.hash_errors,
        cancelled: stats.aborted,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    info!(
        %scan_id,
        files = summary.files_hashed,
        groups = summary.duplicate_groups,
        errors = summary.errors,
        duration_ms = summary.duration_ms,
        "Scan finished"
    );
    shared.events.send(Event::Scan(ScanEvent::Completed {
        summary: summary.clone(),
    }));

    Ok(summary)
}

/// Record a root failure in the feed and move to `Failed`.
fn fail(shared: &Shared, err: ScanError) -> ScanError {
    error!(error = %err, "Scan aborted");
    shared.reporter.push_error(&err);
    shared
        .events
        .send(Event::Pipeline(PipelineEvent::Error {
            message: err.to_string(),
        }));
    shared.set_state(ScanState::Failed);
    err
}

/// Fingerprints each visited file into the shared registry.
struct ScanVisitor<'a> {
    shared: &'a Shared,
    cancel: &'a CancellationToken,
    refresh_every: usize,
    pending_refresh: usize,
    directories: usize,
    files_hashed: usize,
    hash_errors: usize,
}

impl<'a> ScanVisitor<'a> {
    fn new(shared: &'a Shared, cancel: &'a CancellationToken) -> Self {
        Self {
            shared,
            cancel,
            refresh_every: shared.config.refresh_every.max(1),
            pending_refresh: 0,
            directories: 0,
            files_hashed: 0,
            hash_errors: 0,
        }
    }

    fn enter_directory(&mut self, entry: &EntryInfo) {
        self.directories += 1;

        if self.pending_refresh > 0 {
            self.shared.reporter.refresh(&self.shared.registry());
            self.pending_refresh = 0;
        }

        self.shared
            .events
            .send(Event::Scan(ScanEvent::Progress(ScanProgress {
                directories_scanned: self.directories,
                files_hashed: self.files_hashed,
                current_path: entry.path.clone(),
            })));
    }

    fn hash_file(&mut self, entry: &EntryInfo) {
        let digest = match self.shared.hasher.fingerprint(&entry.path) {
            Ok(digest) => digest,
            Err(e) => {
                warn!(error = %e, "Skipping file that could not be fingerprinted");
                self.shared.events.send(Event::Scan(ScanEvent::Error {
                    path: entry.path.clone(),
                    message: e.to_string(),
                }));
                self.hash_errors += 1;
                return;
            }
        };

        let mut registry = self.shared.registry();
        registry.record(digest, entry.path.clone());
        self.files_hashed += 1;
        self.pending_refresh += 1;

        if self.pending_refresh >= self.refresh_every {
            self.shared.reporter.refresh(&registry);
            self.pending_refresh = 0;
        }
        drop(registry);

        self.shared.events.send(Event::Scan(ScanEvent::FileHashed {
            path: entry.path.clone(),
        }));
    }
}

impl EntryVisitor for ScanVisitor<'_> {
    fn visit(&mut self, entry: &EntryInfo) -> WalkControl {
        if self.cancel.is_cancelled() {
            return WalkControl::Abort;
        }

        if entry.is_dir {
            self.enter_directory(entry);
        } else {
            self.hash_file(entry);
        }

        WalkControl::Continue
    }
}
