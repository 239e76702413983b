//! # Pipeline Module
//!
//! Orchestrates one end-to-end duplicate scan.
//!
//! ## Scan Stages
//! 1. **Reset** - Clear the registry and the result feed
//! 2. **Validate** - Resolve `base/subdir` and check that it can be read
//! 3. **Walk** - Traverse the tree, fingerprinting and recording each file
//! 4. **Report** - Refresh the feed as files are recorded, and once at the end
//!
//! ## Concurrency
//! At most one scan runs per controller. Background scans run on a dedicated
//! thread and return a [`ScanHandle`]; readers poll [`ScanController::results`]
//! from any thread.

mod executor;
mod handle;

pub use executor::{resolve_root, ScanController, ScanControllerBuilder, CANCELLED_LINE};
pub use handle::{CancellationToken, ScanHandle};
