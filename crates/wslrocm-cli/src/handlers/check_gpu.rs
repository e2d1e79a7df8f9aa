//! Check-gpu command handler.
//!
//! Runs the driver and runtime library checks of the install without
//! changing the host. Useful after a Windows driver update.

use anyhow::{Context, Result};
use wslrocm_core::{InstallerConfig, ProvisionReport};

use crate::bootstrap::Adapters;
use crate::error::CliError;

pub async fn execute(config: &InstallerConfig) -> Result<u8> {
    let working_dir =
        std::env::current_dir().context("Cannot determine the current directory")?;

    let adapters = Adapters::new();
    let report = adapters
        .provisioner(config)
        .check_host(&working_dir)
        .await
        .map_err(CliError::from)?;

    for line in render(&report) {
        println!("{line}");
    }
    Ok(report.exit_code())
}

fn render(report: &ProvisionReport) -> Vec<String> {
    let mut lines = vec!["✓ ROCm host checks passed".to_string()];
    if let Some(gpu) = &report.gpu_name {
        lines.push(format!("  GPU: {gpu}"));
    }
    if let Some(lib) = &report.runtime_lib {
        lines.push(format!("  HSA runtime: {}", lib.display()));
    }
    lines
}
