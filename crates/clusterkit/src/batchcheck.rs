//! batchcheck - list datasets whose batch download did not finish.

use clap::Parser;
use clusterkit_batch::{DEFAULT_PATTERN, default_inputs, run_scan};
use clusterkit_cli::{BatchArgs, init_logging};
use miette::{IntoDiagnostic, Result};
use std::io;

fn main() -> Result<()> {
    let args = BatchArgs::parse();
    init_logging(args.verbose);

    let files = if args.batch_outputs.is_empty() {
        default_inputs(DEFAULT_PATTERN).into_diagnostic()?
    } else {
        args.batch_outputs.clone()
    };
    if files.is_empty() {
        tracing::info!("No batch output files matching {}", DEFAULT_PATTERN);
        return Ok(());
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    let report = run_scan(
        &files,
        &args.options(),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .into_diagnostic()?;

    tracing::info!(
        "{} of {} datasets need another download",
        report.flagged.len(),
        report.selected
    );
    Ok(())
}
