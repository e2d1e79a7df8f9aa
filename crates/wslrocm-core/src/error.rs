//! Provisioning error types.
//!
//! Every fatal condition a step can hit is a [`ProvisionError`]. Tolerated
//! failures never become errors; they travel as
//! [`StepOutcome::Warned`](crate::StepOutcome::Warned) instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ROCM_WSL_DOCS;
use crate::domain::StepId;
use crate::ports::{CommandError, DownloadError, PromptError};

/// Broad category of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operator declined a confirmation.
    Declined,
    /// A required tool is missing or its diagnostics are wrong.
    MissingTool,
    /// An expected file was not found.
    MissingFile,
    /// A required answer was empty or unusable.
    InvalidInput,
    /// An external command, download, prompt or filesystem operation failed.
    Operation,
}

/// Fatal errors raised by provisioning steps.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Prerequisites were not confirmed. Complete the manual setup and run again.")]
    PrerequisitesDeclined,

    #[error("Virtual environment '{}' already exists and was kept. Choose another name or allow recreation.", .path.display())]
    RecreateDeclined { path: PathBuf },

    #[error("Required command `{command}` was not found on PATH")]
    MissingTool { command: String, hint: String },

    #[error("`{command}` ran but its output does not mention '{expected}'")]
    DiagnosticMismatch { command: String, expected: String },

    #[error("{name} not found at {} or anywhere under {}", .default_path.display(), .search_root.display())]
    LibraryNotFound {
        name: String,
        default_path: PathBuf,
        search_root: PathBuf,
        near_matches: Vec<PathBuf>,
    },

    #[error("{field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("{field} '{value}' must be a single directory name")]
    InvalidName { field: &'static str, value: String },

    #[error("PyTorch cannot access the GPU: {detail}")]
    GpuUnavailable { detail: String },

    #[error("No active virtual environment; it is created in an earlier step")]
    EnvironmentInactive,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProvisionError {
    /// Wrap a filesystem error with what was being attempted and where.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PrerequisitesDeclined | Self::RecreateDeclined { .. } => ErrorKind::Declined,
            Self::MissingTool { .. }
            | Self::DiagnosticMismatch { .. }
            | Self::GpuUnavailable { .. } => ErrorKind::MissingTool,
            Self::LibraryNotFound { .. } => ErrorKind::MissingFile,
            Self::EmptyInput { .. } | Self::InvalidName { .. } => ErrorKind::InvalidInput,
            Self::EnvironmentInactive
            | Self::Command(_)
            | Self::Download(_)
            | Self::Prompt(_)
            | Self::Io { .. } => ErrorKind::Operation,
        }
    }

    /// Remediation hint printed after the error message.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingTool { hint, .. } => Some(hint.clone()),
            Self::DiagnosticMismatch { .. } => Some(format!(
                "Make sure the AMD Adrenalin driver for WSL is installed on Windows. See {ROCM_WSL_DOCS}"
            )),
            Self::LibraryNotFound { near_matches, .. } => {
                if near_matches.is_empty() {
                    Some("No similarly named files were found. Re-run the ROCm install.".to_string())
                } else {
                    let listing = near_matches
                        .iter()
                        .map(|p| format!("  {}", p.display()))
                        .collect::<Vec<_>>()
                        .join("\n");
                    Some(format!("Similarly named files:\n{listing}"))
                }
            }
            Self::GpuUnavailable { .. } => Some(format!(
                "Check `rocminfo` output and the Windows driver version. See {ROCM_WSL_DOCS}"
            )),
            _ => None,
        }
    }

    /// Process exit code. Every fatal condition exits with 1.
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

/// A fatal error together with the step that raised it.
///
/// The step error is part of the message and is not reported as a source.
#[derive(Debug, Error)]
#[error("{step} failed: {error}")]
pub struct ProvisionFailure {
    pub step: StepId,
    pub error: ProvisionError,
}

impl ProvisionFailure {
    pub const fn new(step: StepId, error: ProvisionError) -> Self {
        Self { step, error }
    }

    pub const fn exit_code(&self) -> u8 {
        self.error.exit_code()
    }
}
