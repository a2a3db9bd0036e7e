//! Batch output scanning for clusterkit.
//!
//! Picks the most recent output file per dataset and reports datasets whose
//! downloads did not fully succeed, one name per line, ready to be fed back
//! into the batch loader.

pub mod logfile;
pub mod report;
pub mod select;
pub mod types;

pub use logfile::{ScanError, dataset_name, extract_summary};
pub use report::{DEFAULT_PATTERN, ScanOptions, ScanReport, default_inputs, run_scan, write_report};
pub use select::{select_most_recent, select_newest, stale_files};
pub use types::{DatasetResult, DownloadSummary, LogFile};
