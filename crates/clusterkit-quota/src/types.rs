//! Quota report types.

/// One line of the per-user quota report.
///
/// Format: `user group used limit files file-limit mount`, sizes in GB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuotaRecord {
    pub user: String,
    pub group: String,

    /// Space used (GB)
    pub used_gb: u64,

    /// Space limit (GB), None if not numeric
    pub limit_gb: Option<u64>,

    /// Number of files
    pub files: Option<u64>,

    /// File count limit
    pub file_limit: Option<u64>,

    /// Filesystem mount point
    pub mount: String,
}

/// Usage and limit of a whole group, from the group quota report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupQuota {
    pub used_gb: u64,
    pub limit_gb: u64,
}

/// Aggregated usage of one group across its users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group: String,

    /// Sum of nonzero user usage (GB)
    pub total_gb: u64,

    /// Users with nonzero usage
    pub users: usize,
}
