//! `logmon check` - run one incremental scan and report.

use anyhow::{Context, Result};
use std::io::{self, Write};

use crate::config::Config;
use crate::monitor::{Report, Status};

/// Write the reported findings, one line each.
pub fn print_report(report: &Report, out: &mut dyn Write) -> io::Result<()> {
    for finding in report.reported() {
        writeln!(out, "{}", finding.content)?;
    }
    out.flush()
}

/// Execute a check and return the status to exit with.
pub fn execute(config: Config) -> Result<Status> {
    let monitor = config.build()?;
    let report = monitor
        .run()
        .with_context(|| format!("check of {} failed", monitor.store().log_path().display()))?;

    tracing::info!(status = %report.status, offset = report.offset, "check complete");
    print_report(&report, &mut io::stdout().lock()).context("failed to write report")?;
    Ok(report.status)
}
