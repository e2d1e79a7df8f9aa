//! Steps 2 and 3: ROCm driver stack.

use tracing::{debug, info};
use wslrocm_core::{
    ProvisionError, StepOutcome,
    ports::{CommandSpec, run_checked},
};

use crate::provision::{ProvisionContext, Provisioner, StepResult};
use crate::system::rocminfo::{mentions_vendor, parse_rocminfo};

/// Refresh apt, fetch the installer package and run `amdgpu-install`.
///
/// The package is only downloaded when it is not already in the working
/// directory, and it is only removed once both install commands succeeded.
pub async fn install(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let cwd = ctx.working_dir.clone();

    run_checked(p.runner, &CommandSpec::sudo("apt").arg("update").current_dir(&cwd)).await?;
    run_checked(
        p.runner,
        &CommandSpec::sudo("apt")
            .args(["autoremove", "-y"])
            .current_dir(&cwd),
    )
    .await?;

    let package = p.config.installer_package();
    let local = ctx.resolve(package);
    if local.exists() {
        p.prompt
            .info(&format!("{package} already present, skipping download"));
    } else {
        let url = p.config.installer_url();
        p.prompt.info(&format!("Downloading {url}"));
        let bytes = p.downloader.download(&url, &local).await?;
        debug!(bytes, path = %local.display(), "Installer package downloaded");
    }

    run_checked(
        p.runner,
        &CommandSpec::sudo("apt")
            .args(["install", "-y"])
            .arg(format!("./{package}"))
            .current_dir(&cwd),
    )
    .await?;
    run_checked(
        p.runner,
        &CommandSpec::new("amdgpu-install")
            .args(&p.config.installer_flags)
            .current_dir(&cwd),
    )
    .await?;

    info!(release = %p.config.release, "ROCm driver stack installed");
    Ok(Provisioner::remove_file_tolerant(&local)
        .map_or(StepOutcome::Continue, StepOutcome::warned))
}

/// Run the diagnostic tool and require the vendor string in its output.
pub async fn verify(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let command = p.config.diagnostic_command.as_str();
    if !p.runner.command_exists(command) {
        return Err(ProvisionError::MissingTool {
            command: command.to_string(),
            hint: format!(
                "`{command}` is installed by amdgpu-install. Re-run the install or check that /opt/rocm/bin is on PATH."
            ),
        });
    }

    let spec = CommandSpec::new(command)
        .current_dir(&ctx.working_dir)
        .capture_output();
    let output = p.runner.run(&spec).await?;
    if !output.success() {
        debug!(code = ?output.code, stderr = %output.stderr.trim(), "Diagnostic command exited non-zero");
    }

    let vendor = p.config.vendor_pattern.as_str();
    if !mentions_vendor(&output.stdout, vendor) {
        return Err(ProvisionError::DiagnosticMismatch {
            command: command.to_string(),
            expected: vendor.to_string(),
        });
    }

    ctx.gpu_name = parse_rocminfo(&output.stdout)
        .primary_gpu_name()
        .map(str::to_string);
    match &ctx.gpu_name {
        Some(name) => p.prompt.info(&format!("Detected GPU: {name}")),
        None => p.prompt.info(&format!("{command} reports an {vendor} device")),
    }
    Ok(StepOutcome::Continue)
}
