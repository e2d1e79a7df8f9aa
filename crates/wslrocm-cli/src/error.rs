//! CLI error types and exit-code mapping.

use thiserror::Error;
use wslrocm_core::{ConfigError, ProvisionFailure};

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid `WSLROCM_*` override or unresolvable home directory.
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// A provisioning step failed.
    #[error(transparent)]
    Provision(#[from] ProvisionFailure),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code. Provisioning failures carry their own code.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Provision(failure) => failure.exit_code(),
            Self::Config(_) | Self::Io(_) => 1,
        }
    }

    /// Remediation hint to print under the error, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Provision(failure) => failure.error.hint(),
            Self::Config(ConfigError::UnsupportedRelease(_)) => Some(
                "Unset WSLROCM_ROCM_RELEASE to use the default release.".to_string(),
            ),
            _ => None,
        }
    }
}
