//! scratchquota - scratch disk use of the HEP groups.

use clap::Parser;
use clusterkit_cli::{QuotaArgs, init_logging};
use clusterkit_quota::{CachedLookup, FingerLookup, run_quota_report};
use miette::{IntoDiagnostic, Result};
use std::io;

fn main() -> Result<()> {
    let args = QuotaArgs::parse();
    init_logging(args.verbose);

    let config = args.config();
    let lookup = CachedLookup::new(FingerLookup::new(args.lookup_timeout()).into_diagnostic()?);
    let painter = args.painter();

    let stdout = io::stdout();
    run_quota_report(
        &config,
        args.report_options(),
        &lookup,
        painter.as_ref(),
        &mut stdout.lock(),
    )
    .into_diagnostic()?;
    Ok(())
}
