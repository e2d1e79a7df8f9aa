//! Install command handler.

use anyhow::{Context, Result};
use tracing::info;
use wslrocm_core::{InstallerConfig, ProvisionReport, RunStatus};

use crate::bootstrap::Adapters;
use crate::error::CliError;

/// Run the full provisioning sequence from the current directory.
pub async fn execute(config: &InstallerConfig) -> Result<u8> {
    let working_dir =
        std::env::current_dir().context("Cannot determine the current directory")?;
    info!(release = %config.release, cwd = %working_dir.display(), "Starting install");

    let adapters = Adapters::new();
    let report = adapters
        .provisioner(config)
        .run(&working_dir)
        .await
        .map_err(CliError::from)?;

    for line in summary_lines(&report) {
        println!("{line}");
    }
    Ok(report.exit_code())
}

/// Closing lines printed after a run that did not fail.
pub fn summary_lines(report: &ProvisionReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let RunStatus::Stopped { at } = report.status {
        lines.push(format!("Stopped at {at}; nothing else was changed."));
    }
    if !report.warnings.is_empty() {
        lines.push(format!(
            "Finished with {} warning(s):",
            report.warnings.len()
        ));
        for warning in &report.warnings {
            lines.push(format!("  [{}] {}", warning.step.number(), warning.message));
        }
    }
    lines
}
