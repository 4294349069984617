//! `natplan trip|meeting|calendar`: score a dataset and print the summary.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use natplan_core::{Domain, EvalConfig, driver, write_report};

/// Run one evaluation and print its report to stdout.
pub fn run_eval<D: Domain>(domain: &D, config: &EvalConfig) -> Result<()> {
    info!(
        domain = domain.name(),
        data_path = %config.data_path.display(),
        pred_field = %config.pred_field,
        "starting evaluation"
    );

    let summary = driver::run(domain, config).with_context(|| {
        format!(
            "{} evaluation of {} failed",
            domain.name(),
            config.data_path.display()
        )
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &summary, config.verbose).context("failed to print report")?;
    if let Some(path) = &config.output {
        writeln!(out)?;
        writeln!(out, "Results written to {}", path.display())?;
    }

    Ok(())
}
