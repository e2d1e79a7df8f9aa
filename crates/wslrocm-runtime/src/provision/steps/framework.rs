//! Steps 9 and 15: PyTorch for ROCm.

use std::path::PathBuf;

use tracing::{debug, info, warn};
use wslrocm_core::{
    ProvisionError, StepOutcome,
    ports::{CommandError, run_checked},
};

use crate::provision::{ProvisionContext, Provisioner, StepResult};
use crate::system::pip::skipped_packages;
use crate::system::torch::{GPU_PROBE_SCRIPT, parse_gpu_probe};

/// Download the wheels, replace any installed copies and install them in
/// one `pip` invocation.
pub async fn install_wheels(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let env = Provisioner::environment(ctx)?;
    let wheels = p.config.wheels();
    let mut warnings = Vec::new();

    let mut files: Vec<PathBuf> = Vec::with_capacity(wheels.len());
    for wheel in wheels {
        let dest = ctx.resolve(wheel.file_name);
        let url = p.config.wheel_url(wheel);
        p.prompt.info(&format!("Downloading {}", wheel.file_name));
        match p.downloader.download(&url, &dest).await {
            Ok(bytes) => debug!(package = wheel.package, bytes, "Wheel downloaded"),
            Err(e) => {
                // Earlier wheels are not left behind in the working directory
                let leftovers = files.iter().filter_map(|f| Provisioner::remove_file_tolerant(f));
                for message in leftovers {
                    warn!("{message}");
                }
                return Err(e.into());
            }
        }
        files.push(dest);
    }

    let uninstall = env
        .pip_command(["uninstall", "-y"])
        .args(wheels.iter().map(|w| w.package))
        .current_dir(&ctx.working_dir)
        .capture_output();
    match p.runner.run(&uninstall).await {
        Ok(output) if output.success() => {
            for package in skipped_packages(&output.stdout) {
                warnings.push(format!("{package} was not installed; nothing to uninstall"));
            }
        }
        Ok(output) => warnings.push(CommandError::failed(&uninstall, &output).to_string()),
        Err(e) => warnings.push(e.to_string()),
    }

    let install = env
        .pip_command(["install"])
        .args(files.iter().map(|f| f.to_string_lossy().into_owned()))
        .current_dir(&ctx.working_dir);
    run_checked(p.runner, &install).await?;
    info!(release = %p.config.release, "PyTorch wheels installed");

    warnings.extend(files.iter().filter_map(|f| Provisioner::remove_file_tolerant(f)));
    Ok(StepOutcome::from_warnings(warnings))
}

/// Ask PyTorch inside the environment whether it can see the GPU.
pub async fn verify_gpu(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let env = Provisioner::environment(ctx)?;
    let spec = env
        .python_command(["-c", GPU_PROBE_SCRIPT])
        .current_dir(&ctx.working_dir)
        .capture_output();
    let output = p.runner.run(&spec).await?;

    if !output.success() {
        return Err(ProvisionError::GpuUnavailable {
            detail: format!("the torch check failed: {}", output.summary()),
        });
    }

    let probe = parse_gpu_probe(&output.stdout);
    if !probe.available {
        return Err(ProvisionError::GpuUnavailable {
            detail: "torch.cuda.is_available() returned False".to_string(),
        });
    }

    let device = probe
        .device_name
        .or_else(|| ctx.gpu_name.clone())
        .unwrap_or_else(|| "unknown device".to_string());
    p.prompt.info(&format!("PyTorch sees the GPU: {device}"));
    ctx.gpu_name = Some(device);
    Ok(StepOutcome::Continue)
}
