//! # CLI Module
//!
//! Command-line interface for the duplicate file finder.
//!
//! ## Usage
//! ```bash
//! # Scan a directory below the current one
//! dupfind scan projects
//!
//! # Include empty files and .git directories, save the listing
//! dupfind scan projects --include-empty --include-vcs --save
//!
//! # Raw feed lines, exactly as a GUI would show them
//! dupfind scan --base /srv data --output plain
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use duplicate_file_finder::core::pipeline::ScanController;
use duplicate_file_finder::core::reporter::{export_results, ERROR_LINE};
use duplicate_file_finder::error::{DuplicateFinderError, Result};
use duplicate_file_finder::events::{Event, EventChannel, ScanEvent, ScanSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Duplicate File Finder - list files with identical content
#[derive(Parser, Debug)]
#[command(name = "dupfind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory tree for files with identical content
    Scan {
        /// Directory to scan, relative to --base (or absolute)
        subdir: Option<String>,

        /// Base directory (defaults to the current directory)
        #[arg(long)]
        base: Option<PathBuf>,

        /// Also compare zero-byte files
        #[arg(long)]
        include_empty: bool,

        /// Also descend into version-control metadata directories
        #[arg(long)]
        include_vcs: bool,

        /// Directory names treated as version-control metadata
        #[arg(long = "vcs-dir", default_value = ".git")]
        vcs_dirs: Vec<String>,

        /// Visit directory entries in name order
        #[arg(long)]
        sorted: bool,

        /// How often to poll the result feed, in milliseconds
        #[arg(long, default_value = "500")]
        poll_ms: u64,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Save the final listing to results-<timestamp>.txt
        #[arg(long)]
        save: bool,

        /// Directory for saved results (defaults to the current directory)
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// The result feed, line by line
    Plain,
    /// JSON output for scripting
    Json,
}

struct ScanOptions {
    subdir: String,
    base: Option<PathBuf>,
    include_empty: bool,
    include_vcs: bool,
    vcs_dirs: Vec<String>,
    sorted: bool,
    poll: Duration,
    output: OutputFormat,
    save_dir: Option<PathBuf>,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            subdir,
            base,
            include_empty,
            include_vcs,
            vcs_dirs,
            sorted,
            poll_ms,
            output,
            save,
            save_dir,
            verbose,
        } => {
            duplicate_file_finder::init_tracing(if verbose { "debug" } else { "warn" });

            let save_dir = if save {
                Some(save_dir.map_or_else(current_dir, Ok)?)
            } else {
                None
            };

            run_scan(ScanOptions {
                subdir: subdir.unwrap_or_default(),
                base,
                include_empty,
                include_vcs,
                vcs_dirs,
                sorted,
                poll: Duration::from_millis(poll_ms.max(1)),
                output,
                save_dir,
                verbose,
            })
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        DuplicateFinderError::Config(format!("cannot read current directory: {}", e))
    })
}

fn run_scan(options: ScanOptions) -> Result<()> {
    let term = Term::stderr();
    let base = options.base.clone().map_or_else(current_dir, Ok)?;

    let (sender, receiver) = EventChannel::new();
    let controller = ScanController::builder()
        .ignore_empty_files(!options.include_empty)
        .ignore_vcs_metadata(!options.include_vcs)
        .vcs_dir_names(options.vcs_dirs.clone())
        .sort_entries(options.sorted)
        .events(sender)
        .with_banner()
        .build();

    if matches!(options.output, OutputFormat::Pretty) {
        for line in controller.results() {
            term.write_line(&style(line).dim().to_string()).ok();
        }
        term.write_line("").ok();
    }

    let handle = controller.start(&base, &options.subdir)?;

    let progress = if matches!(options.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {elapsed} {prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_prefix(display_path(handle.root()));
        Some(pb)
    } else {
        None
    };

    let mut files_hashed = 0usize;
    let mut last_poll: Option<Instant> = None;

    // Poll the feed on a fixed cadence, like a GUI timer would
    while !handle.is_finished() {
        if let Some(event) = receiver.recv_timeout(options.poll) {
            track_event(&event, &mut files_hashed, options.verbose, progress.as_ref());
        }
        for event in receiver.try_iter() {
            track_event(&event, &mut files_hashed, options.verbose, progress.as_ref());
        }

        if last_poll.map_or(true, |at| at.elapsed() >= options.poll) {
            last_poll = Some(Instant::now());
            let feed = controller.results();
            if let Some(pb) = progress.as_ref() {
                pb.set_message(format!(
                    "{} files hashed - {}",
                    files_hashed,
                    feed.last().map(String::as_str).unwrap_or("")
                ));
            }
        }
    }

    let outcome = handle.await_completion();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            for line in controller.results() {
                term.write_line(&style(line).red().to_string()).ok();
            }
            return Err(e.into());
        }
    };

    let feed = controller.results();
    match options.output {
        OutputFormat::Pretty => print_pretty_results(&term, &controller, &summary),
        OutputFormat::Plain => print_plain_results(&feed),
        OutputFormat::Json => print_json_results(&controller, &summary),
    }

    if let Some(dir) = options.save_dir {
        match export_results(&feed, &dir) {
            Ok(path) => {
                term.write_line(&format!("Saved results to {}", path.display()))
                    .ok();
            }
            Err(e) => {
                term.write_line(&style(ERROR_LINE).red().to_string()).ok();
                term.write_line(&style(e.to_string()).red().to_string()).ok();
            }
        }
    }

    Ok(())
}

fn track_event(
    event: &Event,
    files_hashed: &mut usize,
    verbose: bool,
    progress: Option<&ProgressBar>,
) {
    match event {
        Event::Scan(ScanEvent::FileHashed { path }) => {
            *files_hashed += 1;
            if verbose {
                if let Some(pb) = progress {
                    pb.set_message(format!("{} files hashed - {}", files_hashed, path.display()));
                }
            }
        }
        Event::Scan(ScanEvent::Error { path, message }) => {
            if let Some(pb) = progress {
                pb.println(format!(
                    "{} {}: {}",
                    style("!").yellow(),
                    path.display(),
                    message
                ));
            }
        }
        _ => {}
    }
}

fn print_pretty_results(term: &Term, controller: &ScanController, summary: &ScanSummary) {
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files hashed in {:.1}s",
        style(summary.files_hashed).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} distinct contents",
        style(summary.distinct_digests).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups",
        style(summary.duplicate_groups).cyan()
    ))
    .ok();
    if summary.skipped > 0 {
        term.write_line(&format!("  {} entries skipped", style(summary.skipped).dim()))
            .ok();
    }
    if summary.errors > 0 {
        term.write_line(&format!(
            "  {} entries could not be read",
            style(summary.errors).yellow()
        ))
        .ok();
    }
    if summary.cancelled {
        term.write_line(&format!("  {}", style("Scan was cancelled").yellow()))
            .ok();
    }
    term.write_line("").ok();

    let groups = controller.duplicate_groups();
    if groups.is_empty() {
        term.write_line("  No duplicates found.").ok();
        return;
    }

    let redundant: usize = groups.iter().map(|group| group.duplicate_count()).sum();
    term.write_line(&format!(
        "  {} redundant copies could be removed",
        style(redundant).yellow()
    ))
    .ok();
    term.write_line("").ok();

    for group in &groups {
        term.write_line(&style(group.header()).bold().to_string()).ok();
        for path in &group.paths {
            term.write_line(&format!("    {}", display_path(path))).ok();
        }
    }
    term.write_line("").ok();
    term.write_line(
        &style("No files were changed. Review the groups before removing anything.")
            .dim()
            .to_string(),
    )
    .ok();
}

fn print_plain_results(feed: &[String]) {
    for line in feed {
        println!("{}", line);
    }
}

fn print_json_results(controller: &ScanController, summary: &ScanSummary) {
    let output = serde_json::json!({
        "summary": summary,
        "groups": controller.duplicate_groups(),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_default()
    );
}

/// Show paths under the home directory as `~/...`
fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf))
        .map(|relative| format!("~/{}", relative.display()))
        .unwrap_or_else(|| path.display().to_string())
}
