//! Quota report output.

use crate::aggregate::{UsageTotals, aggregate_by_group, per_user_average, share};
use crate::bar::{BarConfig, render_bar};
use crate::lookup::{DirectoryLookup, UNKNOWN_NAME};
use crate::parse::{QuotaError, read_group_total, read_user_quotas};
use crate::theme::Painter;
use crate::types::{GroupQuota, UserQuotaRecord};
use camino::Utf8PathBuf;
use std::collections::BTreeSet;
use std::io::{self, Write};

pub const DEFAULT_USER_QUOTAS: &str = "/share/config/quotas/lustre-scratch-user-quotas.txt";
pub const DEFAULT_GROUP_QUOTAS: &str = "/share/config/quotas/lustre-scratch-group-quotas.txt";

/// Group whose line in the group report drives the usage bar.
pub const DEFAULT_GROUP: &str = "hep";

/// Groups included in the per-user breakdown.
pub const DEFAULT_ALLOWED_GROUPS: &[&str] = &[
    "golling", "tipton", "demers", "baker", "baltay", "hepadmin", "astrousr",
];

/// Where the quota snapshots live and what to report on.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub user_quotas: Utf8PathBuf,
    pub group_quotas: Utf8PathBuf,
    pub group: String,
    pub allowed_groups: BTreeSet<String>,
    pub bar: BarConfig,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            user_quotas: Utf8PathBuf::from(DEFAULT_USER_QUOTAS),
            group_quotas: Utf8PathBuf::from(DEFAULT_GROUP_QUOTAS),
            group: DEFAULT_GROUP.to_string(),
            allowed_groups: DEFAULT_ALLOWED_GROUPS
                .iter()
                .map(|g| g.to_string())
                .collect(),
            bar: BarConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print the per-user and per-group table
    pub breakdown: bool,
    /// Print the raw group numbers instead of the bar
    pub verbose: bool,
}

fn row(user: &str, group: &str, usage: &str, name: &str) -> String {
    format!("{:<10} {:<10} {:>11} {:<30}", user, group, usage, name)
}

fn usage_with_share(used_gb: u64, total_gb: u64) -> String {
    let pct = match share(used_gb, total_gb) {
        Some(frac) => format!("{:.0}%", frac * 100.0),
        None => "n/a".to_string(),
    };
    format!("{:>5} ({:>3})", used_gb, pct)
}

fn group_note(total_gb: u64, users: usize) -> String {
    match per_user_average(total_gb, users) {
        Some(avg) => format!("{} user(s), avg {:.0}", users, avg),
        None => "no users, avg n/a".to_string(),
    }
}

/// Write the per-user table followed by per-group and overall totals.
///
/// Users with zero usage are left out.
pub fn write_breakdown<W: Write>(
    records: &[UserQuotaRecord],
    lookup: &dyn DirectoryLookup,
    out: &mut W,
) -> io::Result<UsageTotals> {
    let totals = aggregate_by_group(records);
    let separator = row("----", "-----", "-----------", "---------");

    writeln!(out, "{}", row("user", "group", "use [GB]   ", "full name"))?;
    writeln!(out, "{}", separator)?;
    for record in records.iter().filter(|r| r.used_gb > 0) {
        let name = lookup
            .display_name(&record.user)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let usage = usage_with_share(record.used_gb, totals.grand_total_gb);
        writeln!(out, "{}", row(&record.user, &record.group, &usage, &name))?;
    }
    writeln!(out, "{}", separator)?;

    for group in &totals.groups {
        let usage = usage_with_share(group.total_gb, totals.grand_total_gb);
        let note = group_note(group.total_gb, group.users);
        writeln!(out, "{}", row("total", &group.group, &usage, &note))?;
    }
    writeln!(out, "{}", separator)?;
    writeln!(
        out,
        "{}",
        row("total", "all", &totals.grand_total_gb.to_string(), "")
    )?;
    Ok(totals)
}

/// Write the group usage bar, or the raw numbers when `verbose`.
pub fn write_usage<W: Write>(
    quota: GroupQuota,
    config: &QuotaConfig,
    verbose: bool,
    painter: &dyn Painter,
    out: &mut W,
) -> io::Result<()> {
    if verbose {
        writeln!(out)?;
        writeln!(out, "see {} for more", config.user_quotas)?;
        writeln!(
            out,
            "cross check: using {} of {} GB (from {})",
            quota.used_gb, quota.limit_gb, config.group_quotas
        )?;
    } else {
        writeln!(
            out,
            "{}",
            render_bar(quota.used_gb, quota.limit_gb, &config.bar, painter)
        )?;
    }
    Ok(())
}

/// Read the quota snapshots and write the report.
pub fn run_quota_report<W: Write>(
    config: &QuotaConfig,
    options: ReportOptions,
    lookup: &dyn DirectoryLookup,
    painter: &dyn Painter,
    out: &mut W,
) -> Result<(), QuotaError> {
    config.bar.validate()?;

    if options.breakdown {
        let records = read_user_quotas(&config.user_quotas, &config.allowed_groups)?;
        let totals = write_breakdown(&records, lookup, out)?;
        tracing::debug!(
            "{} GB used across {} groups",
            totals.grand_total_gb,
            totals.groups.len()
        );
    }

    let quota = read_group_total(&config.group_quotas, &config.group)?;
    write_usage(quota, config, options.verbose, painter, out)?;
    out.flush()?;
    Ok(())
}
