//! The provisioning pipeline.
//!
//! [`Provisioner`] runs the steps of [`StepId::ALL`] strictly in order. Each
//! step returns a [`StepOutcome`] or a fatal [`ProvisionError`]:
//!
//! - `Continue` moves on to the next step
//! - `Warned` records the tolerated failures and moves on
//! - `Stop` ends the run successfully without running later steps
//! - `Err` ends the run with a [`ProvisionFailure`] naming the step

mod context;
pub mod search;
mod steps;

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use wslrocm_core::{
    InstallerConfig, ProvisionError, ProvisionFailure, ProvisionReport, RunStatus, StepId,
    StepOutcome,
    ports::{CommandRunner, Downloader, PromptPort},
};

pub use context::{ActiveEnvironment, ProvisionContext};

pub(crate) type StepResult = Result<StepOutcome, ProvisionError>;

/// Drives the provisioning steps against injected host adapters.
pub struct Provisioner<'a> {
    pub(crate) config: &'a InstallerConfig,
    pub(crate) runner: &'a dyn CommandRunner,
    pub(crate) prompt: &'a dyn PromptPort,
    pub(crate) downloader: &'a dyn Downloader,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        config: &'a InstallerConfig,
        runner: &'a dyn CommandRunner,
        prompt: &'a dyn PromptPort,
        downloader: &'a dyn Downloader,
    ) -> Self {
        Self {
            config,
            runner,
            prompt,
            downloader,
        }
    }

    /// Run the full install sequence starting in `working_dir`.
    pub async fn run(&self, working_dir: &Path) -> Result<ProvisionReport, ProvisionFailure> {
        let mut ctx = ProvisionContext::new(working_dir);
        self.run_steps(&StepId::ALL, &mut ctx).await
    }

    /// Run only the read-only driver and runtime library checks.
    pub async fn check_host(&self, working_dir: &Path) -> Result<ProvisionReport, ProvisionFailure> {
        let mut ctx = ProvisionContext::inspect(working_dir);
        self.run_steps(&StepId::HOST_CHECKS, &mut ctx).await
    }

    /// Run `steps` in order against `ctx`.
    pub async fn run_steps(
        &self,
        steps: &[StepId],
        ctx: &mut ProvisionContext,
    ) -> Result<ProvisionReport, ProvisionFailure> {
        let mut report = ProvisionReport::new();
        let total = StepId::ALL.len();

        for &step in steps {
            self.prompt
                .info(&format!("[{}/{total}] {}", step.number(), step.title()));
            info!(step = step.number(), title = step.title(), "Running step");

            let outcome = match self.run_step(step, ctx).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(step = step.number(), error = %error, "Step failed");
                    return Err(ProvisionFailure::new(step, error));
                }
            };
            report.record(step);

            match outcome {
                StepOutcome::Continue => {}
                StepOutcome::Warned(messages) => {
                    for message in messages {
                        warn!(step = step.number(), "{message}");
                        self.prompt.warn(&message);
                        report.warn(step, message);
                    }
                }
                StepOutcome::Stop => {
                    info!(step = step.number(), "Stopped at user request");
                    report.status = RunStatus::Stopped { at: step };
                    break;
                }
            }
        }

        report.env_dir = ctx.environment.as_ref().map(|e| e.root.clone());
        report.app_dir.clone_from(&ctx.app_dir);
        report.runtime_lib.clone_from(&ctx.runtime_lib);
        report.gpu_name.clone_from(&ctx.gpu_name);
        Ok(report)
    }

    async fn run_step(&self, step: StepId, ctx: &mut ProvisionContext) -> StepResult {
        match step {
            StepId::ConfirmPrerequisites => steps::prerequisites::confirm(self),
            StepId::InstallDriverStack => steps::driver::install(self, ctx).await,
            StepId::VerifyDriverStack => steps::driver::verify(self, ctx).await,
            StepId::VerifyRuntimeLibrary => steps::library::verify(self, ctx).await,
            StepId::InstallEnvBuilder => steps::environment::install_builder(self).await,
            StepId::PromptEnvName => steps::environment::prompt_name(self, ctx),
            StepId::CreateEnvironment => steps::environment::create(self, ctx).await,
            StepId::InstallPipBaseline => steps::environment::upgrade_pip(self, ctx).await,
            StepId::InstallFrameworkWheels => steps::framework::install_wheels(self, ctx).await,
            StepId::ReconcileRuntimeLibrary => steps::library::remove_bundled(self, ctx).await,
            StepId::NormalizeWorkingDir => Ok(steps::application::return_home(self, ctx)),
            StepId::ResolveAppConflict => steps::application::resolve_conflict(self, ctx),
            StepId::AcquireApplication => steps::application::clone(self, ctx).await,
            StepId::PrintInstructions => Ok(steps::report::instructions(self, ctx)),
            StepId::VerifyFrameworkGpu => steps::framework::verify_gpu(self, ctx).await,
            StepId::ReportSuccess => Ok(steps::report::success(self, ctx)),
        }
    }

    /// The active environment, or `EnvironmentInactive` if none was created.
    pub(crate) fn environment(ctx: &ProvisionContext) -> Result<&ActiveEnvironment, ProvisionError> {
        ctx.environment
            .as_ref()
            .ok_or(ProvisionError::EnvironmentInactive)
    }

    /// Remove a file, turning a failure into a warning message.
    pub(crate) fn remove_file_tolerant(path: &Path) -> Option<String> {
        std::fs::remove_file(path)
            .err()
            .map(|e| format!("Could not remove {}: {e}", path.display()))
    }

    pub(crate) fn display_paths(paths: &[PathBuf]) -> String {
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
