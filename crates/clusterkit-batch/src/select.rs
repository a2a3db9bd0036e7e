//! Most-recent batch selection.
//!
//! Reruns of the same dataset produce new output files with higher sequence
//! numbers; only the newest one reflects the current state of the download.

use crate::logfile::{ScanError, dataset_name};
use crate::types::LogFile;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::collections::btree_map::Entry;

/// Keep the highest-sequence file per dataset.
///
/// A later file replaces the stored one only on a strictly greater sequence
/// number, so the first of several equal numbers is kept.
pub fn select_newest<I>(entries: I) -> BTreeMap<String, LogFile>
where
    I: IntoIterator<Item = (String, LogFile)>,
{
    let mut newest: BTreeMap<String, LogFile> = BTreeMap::new();
    for (dataset, file) in entries {
        match newest.entry(dataset) {
            Entry::Vacant(slot) => {
                slot.insert(file);
            }
            Entry::Occupied(mut slot) => {
                if file.sequence > slot.get().sequence {
                    slot.insert(file);
                }
            }
        }
    }
    newest
}

/// Read each file's dataset name and keep the most recent file per dataset.
///
/// Fails on the first file without a sequence number or dataset name.
pub fn select_most_recent(
    paths: &[Utf8PathBuf],
) -> Result<BTreeMap<String, LogFile>, ScanError> {
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let file = LogFile::from_path(path)?;
        let dataset = dataset_name(path)?;
        tracing::debug!("{} -> {} (batch {})", path, dataset, file.sequence);
        entries.push((dataset, file));
    }
    Ok(select_newest(entries))
}

/// Inputs that were not selected, in input order without duplicates.
pub fn stale_files(
    all: &[Utf8PathBuf],
    selected: &BTreeMap<String, LogFile>,
) -> Vec<Utf8PathBuf> {
    let keep: HashSet<&Utf8Path> = selected.values().map(|f| f.path.as_path()).collect();
    let mut stale: Vec<Utf8PathBuf> = Vec::new();
    for path in all {
        if !keep.contains(path.as_path()) && !stale.contains(path) {
            stale.push(path.clone());
        }
    }
    stale
}
