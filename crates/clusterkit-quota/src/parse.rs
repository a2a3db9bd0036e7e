//! Parsers for the scratch quota report files.

use crate::types::{GroupQuota, UserQuotaRecord};
use camino::{Utf8Path, Utf8PathBuf};
use clusterkit_parsers::split_fields;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use thiserror::Error;

/// Fields on a user quota line.
const USER_FIELDS: usize = 7;

#[derive(Error, Debug)]
pub enum QuotaError {
    #[error("Cannot open quota report {path}: {source}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Group {group} not found in {path}")]
    GroupNotFound { group: String, path: Utf8PathBuf },
    #[error("Malformed quota line for group {group}: {line}")]
    Malformed { group: String, line: String },
    #[error("Crop fraction must be in [0, 1), got {0}")]
    InvalidCrop(f64),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn open(path: &Utf8Path) -> Result<BufReader<File>, QuotaError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| QuotaError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse one user quota line; None for lines that do not fit the schema.
fn parse_user_line(line: &str) -> Option<UserQuotaRecord> {
    let fields = split_fields(line, USER_FIELDS).ok()?;
    Some(UserQuotaRecord {
        user: fields[0].to_string(),
        group: fields[1].to_string(),
        used_gb: fields[2].parse().ok()?,
        limit_gb: fields[3].parse().ok(),
        files: fields[4].parse().ok(),
        file_limit: fields[5].parse().ok(),
        mount: fields[6].to_string(),
    })
}

/// Parse the per-user quota report, keeping only allowed groups.
///
/// Headers and other lines that do not split into seven fields with a numeric
/// usage are skipped. Records are sorted by usage descending, then group and
/// user ascending.
pub fn parse_user_quotas<R: BufRead>(
    reader: R,
    allowed_groups: &BTreeSet<String>,
) -> Result<Vec<UserQuotaRecord>, QuotaError> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        match parse_user_line(&line) {
            Some(record) if allowed_groups.contains(&record.group) => records.push(record),
            Some(_) => {}
            None => tracing::trace!("Skipping quota line: {}", line),
        }
    }

    records.sort_by(|a, b| {
        b.used_gb
            .cmp(&a.used_gb)
            .then_with(|| a.group.cmp(&b.group))
            .then_with(|| a.user.cmp(&b.user))
    });
    Ok(records)
}

/// Find the first line of the group quota report for `group`.
///
/// Lines look like `<id> <group> <used> <limit> ...`.
pub fn parse_group_total<R: BufRead>(
    reader: R,
    group: &str,
) -> Result<Option<GroupQuota>, QuotaError> {
    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || fields[1] != group {
            continue;
        }
        let malformed = || QuotaError::Malformed {
            group: group.to_string(),
            line: line.clone(),
        };
        let used_gb = fields[2].parse().map_err(|_| malformed())?;
        let limit_gb = fields[3].parse().map_err(|_| malformed())?;
        return Ok(Some(GroupQuota { used_gb, limit_gb }));
    }
    Ok(None)
}

/// Read and parse the per-user quota report at `path`.
pub fn read_user_quotas(
    path: &Utf8Path,
    allowed_groups: &BTreeSet<String>,
) -> Result<Vec<UserQuotaRecord>, QuotaError> {
    let records = parse_user_quotas(open(path)?, allowed_groups)?;
    tracing::debug!("Read {} user quota records from {}", records.len(), path);
    Ok(records)
}

/// Read the usage of `group` from the group quota report at `path`.
pub fn read_group_total(path: &Utf8Path, group: &str) -> Result<GroupQuota, QuotaError> {
    parse_group_total(open(path)?, group)?.ok_or_else(|| QuotaError::GroupNotFound {
        group: group.to_string(),
        path: path.to_path_buf(),
    })
}
