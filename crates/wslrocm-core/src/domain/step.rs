//! Provisioning step identifiers and outcomes.

use std::fmt;

/// One unit of the provisioning sequence.
///
/// Variants are declared in execution order; [`StepId::ALL`] is the full
/// install sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    ConfirmPrerequisites,
    InstallDriverStack,
    VerifyDriverStack,
    VerifyRuntimeLibrary,
    InstallEnvBuilder,
    PromptEnvName,
    CreateEnvironment,
    InstallPipBaseline,
    InstallFrameworkWheels,
    ReconcileRuntimeLibrary,
    NormalizeWorkingDir,
    ResolveAppConflict,
    AcquireApplication,
    PrintInstructions,
    VerifyFrameworkGpu,
    ReportSuccess,
}

impl StepId {
    /// The full install sequence, in order.
    pub const ALL: [Self; 16] = [
        Self::ConfirmPrerequisites,
        Self::InstallDriverStack,
        Self::VerifyDriverStack,
        Self::VerifyRuntimeLibrary,
        Self::InstallEnvBuilder,
        Self::PromptEnvName,
        Self::CreateEnvironment,
        Self::InstallPipBaseline,
        Self::InstallFrameworkWheels,
        Self::ReconcileRuntimeLibrary,
        Self::NormalizeWorkingDir,
        Self::ResolveAppConflict,
        Self::AcquireApplication,
        Self::PrintInstructions,
        Self::VerifyFrameworkGpu,
        Self::ReportSuccess,
    ];

    /// Read-only host checks used by `check-gpu`.
    pub const HOST_CHECKS: [Self; 2] = [Self::VerifyDriverStack, Self::VerifyRuntimeLibrary];

    /// 1-based position in the install sequence.
    pub const fn number(self) -> usize {
        self as usize + 1
    }

    /// Human-readable step title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::ConfirmPrerequisites => "Confirm prerequisites",
            Self::InstallDriverStack => "Install ROCm driver stack",
            Self::VerifyDriverStack => "Verify ROCm installation",
            Self::VerifyRuntimeLibrary => "Verify HSA runtime library",
            Self::InstallEnvBuilder => "Install Python venv support",
            Self::PromptEnvName => "Choose virtual environment name",
            Self::CreateEnvironment => "Create virtual environment",
            Self::InstallPipBaseline => "Upgrade pip and wheel",
            Self::InstallFrameworkWheels => "Install PyTorch for ROCm",
            Self::ReconcileRuntimeLibrary => "Remove bundled HSA runtime",
            Self::NormalizeWorkingDir => "Return to home directory",
            Self::ResolveAppConflict => "Check for existing ComfyUI",
            Self::AcquireApplication => "Clone ComfyUI",
            Self::PrintInstructions => "Post-install instructions",
            Self::VerifyFrameworkGpu => "Verify PyTorch GPU access",
            Self::ReportSuccess => "Done",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

/// Non-fatal result of a step.
///
/// Fatal conditions are reported as `Err(ProvisionError)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step finished; continue with the next one.
    Continue,
    /// The step finished but tolerated one or more failures.
    Warned(Vec<String>),
    /// The user chose to stop; end the run successfully.
    Stop,
}

impl StepOutcome {
    /// `Continue` when no warnings were collected, `Warned` otherwise.
    pub fn from_warnings(warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            Self::Continue
        } else {
            Self::Warned(warnings)
        }
    }

    /// Single tolerated failure.
    pub fn warned(message: impl Into<String>) -> Self {
        Self::Warned(vec![message.into()])
    }
}
