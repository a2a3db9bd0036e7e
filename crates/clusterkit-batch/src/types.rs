//! Batch output types.

use crate::logfile::ScanError;
use camino::{Utf8Path, Utf8PathBuf};
use clusterkit_parsers::trailing_number;

/// A batch output file and the sequence number embedded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Path as given on the command line
    pub path: Utf8PathBuf,

    /// Number after the last `o` in the file name (`job.sh.o1234` -> 1234)
    pub sequence: u64,
}

impl LogFile {
    /// Build a log file entry, failing if the name carries no sequence number.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ScanError> {
        let name = path.file_name().unwrap_or(path.as_str());
        let sequence =
            trailing_number(name, 'o').ok_or_else(|| ScanError::NoSequence(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            sequence,
        })
    }
}

/// Download summary found at the end of a batch output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Failed download attempts; None when the summary line is missing
    pub failed: Option<u64>,

    /// Last lines of the file, kept for diagnostics
    pub tail: Vec<String>,
}

impl DownloadSummary {
    /// Whether the dataset needs to be downloaded again.
    ///
    /// A missing summary counts as an unbounded number of failures.
    pub fn is_failing(&self) -> bool {
        self.failed.is_none_or(|n| n != 0)
    }

    /// Failure count for display ("inf" when unknown).
    pub fn failed_display(&self) -> String {
        match self.failed {
            Some(n) => n.to_string(),
            None => "inf".to_string(),
        }
    }
}

/// Scan result for one selected batch output file.
#[derive(Debug, Clone)]
pub struct DatasetResult {
    pub dataset: String,
    pub file: LogFile,
    pub summary: DownloadSummary,
}
