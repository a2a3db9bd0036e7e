//! Failed-download report.
//!
//! Dataset names go to the primary writer, one per line, so the output can be
//! piped straight back into the batch loader. Warnings and tail dumps go to
//! the diagnostic writer.

use crate::logfile::{ScanError, extract_summary};
use crate::select::{select_most_recent, stale_files};
use crate::types::DatasetResult;
use camino::Utf8PathBuf;
use std::fs;
use std::io::{self, Write};

/// Glob used when no batch output files are given.
pub const DEFAULT_PATTERN: &str = "dq2batch-*.sh.o*";

/// Options for a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Dump the tail of every flagged file to the diagnostic writer.
    pub verbose: bool,
    /// Delete every input that is not the most recent for its dataset.
    /// This is irreversible.
    pub clean: bool,
}

/// What a scan did.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Datasets written to the primary output
    pub flagged: Vec<String>,
    /// Number of most-recent files examined
    pub selected: usize,
    /// Stale files removed by `clean`
    pub removed: Vec<Utf8PathBuf>,
}

/// Expand a glob pattern into batch output paths, sorted by name.
pub fn default_inputs(pattern: &str) -> Result<Vec<Utf8PathBuf>, ScanError> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) => match Utf8PathBuf::from_path_buf(path) {
                Ok(path) => paths.push(path),
                Err(path) => tracing::warn!("Skipping non UTF-8 path {}", path.display()),
            },
            Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
        }
    }
    Ok(paths)
}

/// Select, optionally clean, and report on a set of batch output files.
pub fn run_scan<W: Write, E: Write>(
    files: &[Utf8PathBuf],
    options: &ScanOptions,
    out: &mut W,
    err: &mut E,
) -> Result<ScanReport, ScanError> {
    let selected = select_most_recent(files)?;
    tracing::info!(
        "Selected {} of {} batch output files",
        selected.len(),
        files.len()
    );

    let mut removed = Vec::new();
    if options.clean {
        for path in stale_files(files, &selected) {
            fs::remove_file(&path).map_err(|source| ScanError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Removed stale batch output {}", path);
            removed.push(path);
        }
    }

    let mut results = Vec::with_capacity(selected.len());
    for (dataset, file) in selected {
        let (_, summary) = extract_summary(&file.path)?;
        results.push(DatasetResult {
            dataset,
            file,
            summary,
        });
    }

    let flagged = write_report(&results, options.verbose, out, err)?;
    Ok(ScanReport {
        flagged,
        selected: results.len(),
        removed,
    })
}

/// Write failing datasets in the order given and return their names.
///
/// A missing summary is warned about and treated as failing. With `verbose`,
/// its tail is dumped once, under the `-- <dataset> --` header that follows
/// the warning, rather than also directly after the warning.
pub fn write_report<W: Write, E: Write>(
    results: &[DatasetResult],
    verbose: bool,
    out: &mut W,
    err: &mut E,
) -> io::Result<Vec<String>> {
    let mut flagged = Vec::new();
    for result in results {
        if result.summary.failed.is_none() {
            writeln!(err, "WARNING: {} missing summary", result.file.path)?;
        }
        if !result.summary.is_failing() {
            continue;
        }

        writeln!(out, "{}", result.dataset)?;
        tracing::debug!(
            "{} failed {} downloads",
            result.dataset,
            result.summary.failed_display()
        );
        if verbose {
            writeln!(err, "-- {} --", result.dataset)?;
            dump_tail(result, err)?;
        }
        flagged.push(result.dataset.clone());
    }
    out.flush()?;
    Ok(flagged)
}

fn dump_tail<E: Write>(result: &DatasetResult, err: &mut E) -> io::Result<()> {
    writeln!(err, "tail of: {}", result.file.path)?;
    for line in &result.summary.tail {
        if line.trim().is_empty() {
            continue;
        }
        writeln!(err, "{}", line)?;
    }
    writeln!(err)
}
