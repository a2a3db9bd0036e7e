//! CLI argument parsing for the clusterkit tools.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use clusterkit_batch::ScanOptions;
use clusterkit_quota::report::{
    DEFAULT_ALLOWED_GROUPS, DEFAULT_GROUP, DEFAULT_GROUP_QUOTAS, DEFAULT_USER_QUOTAS,
};
use clusterkit_quota::{BarConfig, Painter, Plain, QuotaConfig, ReportOptions, Theme};
use std::io::IsTerminal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Find batch downloads that need to be restarted.
///
/// Prints one dataset name per line, so unfinished downloads can be restarted
/// with `batchcheck | batchload`.
#[derive(Parser, Debug)]
#[command(name = "batchcheck")]
pub struct BatchArgs {
    /// Batch output files (default: dq2batch-*.sh.o* in the current directory)
    pub batch_outputs: Vec<Utf8PathBuf>,

    /// Dump the tail of each failing batch output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Remove old batch files (cannot be undone)
    #[arg(short, long)]
    pub clean: bool,
}

impl BatchArgs {
    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            verbose: self.verbose,
            clean: self.clean,
        }
    }
}

/// When to color the usage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Terminal color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
}

fn parse_crop(s: &str) -> Result<f64, String> {
    let crop: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..1.0).contains(&crop) {
        Ok(crop)
    } else {
        Err(format!("crop fraction must be in [0, 1), got {}", crop))
    }
}

/// Calculate scratch disk use.
#[derive(Parser, Debug)]
#[command(name = "scratchquota")]
pub struct QuotaArgs {
    /// Print usage per user and per group
    #[arg(short, long)]
    pub breakdown: bool,

    /// Print the raw group numbers instead of the usage bar
    #[arg(short, long)]
    pub verbose: bool,

    /// Per-user quota report
    #[arg(long, default_value = DEFAULT_USER_QUOTAS)]
    pub user_quotas: Utf8PathBuf,

    /// Per-group quota report
    #[arg(long, default_value = DEFAULT_GROUP_QUOTAS)]
    pub group_quotas: Utf8PathBuf,

    /// Group whose quota drives the usage bar
    #[arg(long, default_value = DEFAULT_GROUP)]
    pub group: String,

    /// Group to include in the breakdown (repeatable; default: the HEP groups)
    #[arg(long = "allow-group", value_name = "GROUP")]
    pub allow_groups: Vec<String>,

    /// Bar width in characters
    #[arg(long, default_value = "80")]
    pub width: usize,

    /// Fraction of the quota not drawn in the bar
    #[arg(long, default_value = "0.75", value_parser = parse_crop)]
    pub crop: f64,

    /// When to use colors
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,

    /// Color theme
    #[arg(long, value_enum, default_value = "dark")]
    pub theme: ThemeChoice,

    /// Seconds to wait for each name lookup
    #[arg(long, default_value = "5")]
    pub lookup_timeout: u64,
}

impl QuotaArgs {
    pub fn config(&self) -> QuotaConfig {
        let allowed_groups = if self.allow_groups.is_empty() {
            DEFAULT_ALLOWED_GROUPS.iter().map(|g| g.to_string()).collect()
        } else {
            self.allow_groups.iter().cloned().collect()
        };
        QuotaConfig {
            user_quotas: self.user_quotas.clone(),
            group_quotas: self.group_quotas.clone(),
            group: self.group.clone(),
            allowed_groups,
            bar: BarConfig {
                width: self.width,
                crop: self.crop,
                ..BarConfig::default()
            },
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            breakdown: self.breakdown,
            verbose: self.verbose,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout)
    }

    /// Painter for stdout according to `--color` and `--theme`.
    pub fn painter(&self) -> Box<dyn Painter> {
        let colored = match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        };
        if !colored {
            return Box::new(Plain);
        }
        match self.theme {
            ThemeChoice::Dark => Box::new(Theme::dark()),
            ThemeChoice::Light => Box::new(Theme::light()),
        }
    }
}

/// Install a stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown unless
/// `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,clusterkit=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
