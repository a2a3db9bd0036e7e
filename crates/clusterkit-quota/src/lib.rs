//! Scratch quota reporting for clusterkit.
//!
//! Reads the per-user and per-group quota snapshots, aggregates usage for a
//! set of research groups and renders the group's overall usage as a bar.

pub mod aggregate;
pub mod bar;
pub mod lookup;
pub mod parse;
pub mod report;
pub mod theme;
pub mod types;

pub use aggregate::{UsageTotals, aggregate_by_group, per_user_average, share};
pub use bar::{BarConfig, BarLayout, Threshold, render_bar};
pub use lookup::{CachedLookup, DirectoryLookup, FingerLookup, UNKNOWN_NAME};
pub use parse::{QuotaError, parse_group_total, parse_user_quotas, read_group_total, read_user_quotas};
pub use report::{QuotaConfig, ReportOptions, run_quota_report, write_breakdown, write_usage};
pub use theme::{BarStyle, Painter, Plain, Theme};
pub use types::{GroupQuota, GroupSummary, UserQuotaRecord};
