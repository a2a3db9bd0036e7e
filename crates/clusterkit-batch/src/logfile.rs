//! Parser for batch loader output files (`dq2batch-*.sh.o<N>`).
//!
//! The dataset name is announced near the top of the file and the download
//! summary is printed in the last few lines, so only the head and the tail of
//! each file are read.

use crate::types::DownloadSummary;
use camino::{Utf8Path, Utf8PathBuf};
use clusterkit_parsers::marker_value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use thiserror::Error;

/// Line announcing the dataset being downloaded; its last token is the name.
pub const DATASET_MARKER: &str = "Querying DQ2 central catalogues to resolve datasetname";

/// Summary line carrying the number of failed downloads.
pub const FAILED_MARKER: &str = "Number of failed file download attempts:";

/// Number of leading lines searched for the dataset name.
pub const HEAD_LINES: usize = 10;

/// Number of trailing lines searched for the download summary.
pub const TAIL_LINES: usize = 10;

/// Bytes before end-of-file where the tail read starts.
pub const TAIL_BYTES: u64 = 4000;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No batch sequence number in file name: {0}")]
    NoSequence(Utf8PathBuf),
    #[error("No dataset name found in the first 10 lines of {0}")]
    NoDatasetName(Utf8PathBuf),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),
}

fn open(path: &Utf8Path) -> Result<File, ScanError> {
    File::open(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Find the dataset name within the first `HEAD_LINES` lines.
pub fn read_dataset_name<R: BufRead>(reader: R) -> io::Result<Option<String>> {
    for line in reader.split(b'\n').take(HEAD_LINES) {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if let Some(name) = marker_value(&line, DATASET_MARKER) {
            return Ok(Some(name.to_string()));
        }
    }
    Ok(None)
}

/// Read the last `TAIL_LINES` lines, starting at most `TAIL_BYTES` before the end.
pub fn read_tail<R: Read + Seek>(reader: &mut R) -> io::Result<Vec<String>> {
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(end.saturating_sub(TAIL_BYTES)))?;

    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;

    // The seek may land inside a multi-byte character
    let text = String::from_utf8_lossy(&buf);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}

/// Build a summary from tail lines.
///
/// The last well-formed failure line wins. A missing line leaves `failed` unset.
pub fn parse_summary(tail: Vec<String>) -> DownloadSummary {
    let mut failed = None;
    for line in &tail {
        if let Some(value) = marker_value(line, FAILED_MARKER) {
            match value.parse::<u64>() {
                Ok(n) => failed = Some(n),
                Err(e) => tracing::warn!("Ignoring malformed failure count {:?}: {}", value, e),
            }
        }
    }
    DownloadSummary { failed, tail }
}

/// Read the dataset name of a batch output file.
pub fn dataset_name(path: &Utf8Path) -> Result<String, ScanError> {
    let reader = BufReader::new(open(path)?);
    read_dataset_name(reader)
        .map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| ScanError::NoDatasetName(path.to_path_buf()))
}

/// Read the dataset name and download summary of a batch output file.
pub fn extract_summary(path: &Utf8Path) -> Result<(String, DownloadSummary), ScanError> {
    let name = dataset_name(path)?;
    let mut file = open(path)?;
    let tail = read_tail(&mut file).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} tail lines from {}", tail.len(), path);
    Ok((name, parse_summary(tail)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
        let path = Utf8Path::from_path(dir.path()).unwrap().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_dataset_name() {
        let content = "\
Setting up environment
Querying DQ2 central catalogues to resolve datasetname data12_8TeV.00200842.physics_Muons
Downloading...
";
        let name = read_dataset_name(Cursor::new(content)).unwrap();
        assert_eq!(name, Some("data12_8TeV.00200842.physics_Muons".to_string()));
    }

    #[test]
    fn test_read_dataset_name_beyond_head() {
        let mut content = String::new();
        for i in 0..HEAD_LINES {
            content.push_str(&format!("preamble {}\n", i));
        }
        content.push_str("Querying DQ2 central catalogues to resolve datasetname too_late\n");
        assert_eq!(read_dataset_name(Cursor::new(content)).unwrap(), None);
    }

    #[test]
    fn test_read_tail_keeps_last_lines() {
        let content: String = (0..25).map(|i| format!("line {}\n", i)).collect();
        let tail = read_tail(&mut Cursor::new(content)).unwrap();
        assert_eq!(tail.len(), TAIL_LINES);
        assert_eq!(tail[0], "line 15");
        assert_eq!(tail[9], "line 24");
    }

    #[test]
    fn test_read_tail_large_file() {
        let mut content = "x".repeat(10_000);
        content.push_str("\nNumber of failed file download attempts: 2\n");
        let tail = read_tail(&mut Cursor::new(content)).unwrap();
        let summary = parse_summary(tail);
        assert_eq!(summary.failed, Some(2));
        // The partial first line starts inside the long run of x's
        assert!(summary.tail[0].len() < 4000);
    }

    #[test]
    fn test_parse_summary_missing_marker() {
        let tail = vec!["Done.".to_string(), "".to_string()];
        let summary = parse_summary(tail);
        assert_eq!(summary.failed, None);
        assert!(summary.is_failing());
    }

    #[test]
    fn test_parse_summary_malformed_count() {
        let tail = vec![
            "Number of failed file download attempts: 4".to_string(),
            "Number of failed file download attempts: many".to_string(),
        ];
        assert_eq!(parse_summary(tail).failed, Some(4));
    }

    #[test]
    fn test_extract_summary() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            "dq2batch-a.sh.o7",
            "Querying DQ2 central catalogues to resolve datasetname mc12.ttbar\n\
             copying files\n\
             Number of successful file download attempts: 10\n\
             Number of failed file download attempts: 0\n",
        );
        let (name, summary) = extract_summary(&path).unwrap();
        assert_eq!(name, "mc12.ttbar");
        assert_eq!(summary.failed, Some(0));
        assert_eq!(summary.tail.len(), 4);
    }

    #[test]
    fn test_extract_summary_without_marker_does_not_fail() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            "dq2batch-a.sh.o7",
            "Querying DQ2 central catalogues to resolve datasetname mc12.ttbar\nKilled\n",
        );
        let (_, summary) = extract_summary(&path).unwrap();
        assert_eq!(summary.failed, None);
    }

    #[test]
    fn test_dataset_name_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "dq2batch-a.sh.o7", "nothing useful here\n");
        let err = dataset_name(&path).unwrap_err();
        assert!(matches!(err, ScanError::NoDatasetName(_)));
    }

    #[test]
    fn test_dataset_name_unreadable() {
        let err = dataset_name(Utf8Path::new("/nonexistent/dq2batch-a.sh.o1")).unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
