//! Summary of a provisioning run.

use std::path::PathBuf;

use super::step::StepId;

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every step ran.
    Completed,
    /// The user chose to stop at the given step.
    Stopped { at: StepId },
}

/// A tolerated failure, attributed to the step that hit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepWarning {
    pub step: StepId,
    pub message: String,
}

/// Result of a run that finished without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub status: RunStatus,
    /// Steps that ran, in order.
    pub steps: Vec<StepId>,
    pub warnings: Vec<StepWarning>,
    pub env_dir: Option<PathBuf>,
    pub app_dir: Option<PathBuf>,
    pub runtime_lib: Option<PathBuf>,
    pub gpu_name: Option<String>,
}

impl ProvisionReport {
    /// Empty report for a run that has not started.
    pub const fn new() -> Self {
        Self {
            status: RunStatus::Completed,
            steps: Vec::new(),
            warnings: Vec::new(),
            env_dir: None,
            app_dir: None,
            runtime_lib: None,
            gpu_name: None,
        }
    }

    pub fn record(&mut self, step: StepId) {
        self.steps.push(step);
    }

    pub fn warn(&mut self, step: StepId, message: impl Into<String>) {
        self.warnings.push(StepWarning {
            step,
            message: message.into(),
        });
    }

    /// Process exit code for this report. Completed and user-stopped runs both exit 0.
    pub const fn exit_code(&self) -> u8 {
        0
    }

    pub const fn is_completed(&self) -> bool {
        matches!(self.status, RunStatus::Completed)
    }
}

impl Default for ProvisionReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_runs_still_exit_zero() {
        let mut report = ProvisionReport::new();
        report.record(StepId::ResolveAppConflict);
        report.status = RunStatus::Stopped {
            at: StepId::ResolveAppConflict,
        };

        assert_eq!(report.exit_code(), 0);
        assert!(!report.is_completed());
    }

    #[test]
    fn warnings_keep_their_step() {
        let mut report = ProvisionReport::default();
        report.warn(StepId::VerifyRuntimeLibrary, "chmod failed");

        assert_eq!(report.warnings[0].step, StepId::VerifyRuntimeLibrary);
        assert_eq!(report.warnings[0].message, "chmod failed");
    }
}
