//! Per-group usage aggregation.

use crate::types::{GroupSummary, UserQuotaRecord};
use std::collections::HashMap;

/// Usage totals over all allowed groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageTotals {
    /// Groups sorted by total usage descending, then name
    pub groups: Vec<GroupSummary>,
    pub grand_total_gb: u64,
}

/// Sum usage and count users per group, ignoring users with zero usage.
pub fn aggregate_by_group(records: &[UserQuotaRecord]) -> UsageTotals {
    let mut by_group: HashMap<&str, GroupSummary> = HashMap::new();
    let mut grand_total_gb: u64 = 0;

    for record in records.iter().filter(|r| r.used_gb > 0) {
        grand_total_gb = grand_total_gb.saturating_add(record.used_gb);
        let summary = by_group
            .entry(record.group.as_str())
            .or_insert_with(|| GroupSummary {
                group: record.group.clone(),
                total_gb: 0,
                users: 0,
            });
        summary.total_gb = summary.total_gb.saturating_add(record.used_gb);
        summary.users += 1;
    }

    let mut groups: Vec<GroupSummary> = by_group.into_values().collect();
    groups.sort_by(|a, b| b.total_gb.cmp(&a.total_gb).then_with(|| a.group.cmp(&b.group)));

    UsageTotals {
        groups,
        grand_total_gb,
    }
}

/// Average usage per user, or None for a group without users.
pub fn per_user_average(total_gb: u64, users: usize) -> Option<f64> {
    if users == 0 {
        return None;
    }
    Some(total_gb as f64 / users as f64)
}

/// Fraction `part / whole`, or None when `whole` is zero.
pub fn share(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64)
}
