//! # dupfind CLI
//!
//! Command-line interface for the duplicate file finder.
//!
//! ## Usage
//! ```bash
//! dupfind scan projects
//! dupfind scan --base ~/ Documents --include-empty --save
//! ```

mod cli;

use duplicate_file_finder::Result;

fn main() -> Result<()> {
    cli::run()
}
