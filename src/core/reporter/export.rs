//! Saving the result feed to a timestamped text file.

use crate::error::ExportError;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name for results saved at `at`: `results-<YYYY-MM-DD-HHMMSS>.txt`
pub fn results_file_name(at: DateTime<Local>) -> String {
    format!("results-{}.txt", at.format("%Y-%m-%d-%H%M%S"))
}

/// Write the feed lines separated by newlines
pub fn write_results<W: Write>(lines: &[String], mut writer: W) -> std::io::Result<()> {
    writer.write_all(lines.join("\n").as_bytes())?;
    writer.flush()
}

/// Save the feed into `dir`, named after the current local time
pub fn export_results(lines: &[String], dir: &Path) -> Result<PathBuf, ExportError> {
    export_results_at(lines, dir, Local::now())
}

/// Save the feed into `dir`, named after `at`
pub fn export_results_at(
    lines: &[String],
    dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(results_file_name(at));
    let write_error = |source| ExportError::Write {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(write_error)?;
    write_results(lines, BufWriter::new(file)).map_err(write_error)?;

    tracing::info!(path = %path.display(), lines = lines.len(), "Saved results");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn file_name_uses_timestamp_pattern() {
        assert_eq!(
            results_file_name(fixed_time()),
            "results-2024-03-09-070502.txt"
        );
    }

    #[test]
    fn lines_are_joined_without_trailing_newline() {
        let mut buffer = Vec::new();
        write_results(&["one".to_string(), "two".to_string()], &mut buffer).unwrap();
        assert_eq!(buffer, b"one\ntwo");
    }

    #[test]
    fn export_writes_file_into_directory() {
        let temp_dir = TempDir::new().unwrap();
        let lines = vec!["header".to_string(), "/data/a.txt".to_string()];

        let path = export_results_at(&lines, temp_dir.path(), fixed_time()).unwrap();

        assert_eq!(path, temp_dir.path().join("results-2024-03-09-070502.txt"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "header\n/data/a.txt"
        );
    }

    #[test]
    fn export_into_missing_directory_fails_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = export_results_at(&[], &missing, fixed_time()).unwrap_err();

        assert!(err.to_string().contains("nope"));
    }
}
