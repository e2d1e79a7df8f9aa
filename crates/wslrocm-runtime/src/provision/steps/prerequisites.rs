//! Step 1: manual prerequisites.

use wslrocm_core::{ProvisionError, StepOutcome, config::ROCM_WSL_DOCS};

use crate::provision::{Provisioner, StepResult};

const PREREQUISITES: &[&str] = &[
    "Before continuing, complete these steps manually:",
    "  1. Install the latest AMD Adrenalin driver with WSL support on Windows.",
    "  2. Install WSL2 with an Ubuntu 22.04 distribution (`wsl --install -d Ubuntu-22.04`).",
    "  3. Run this installer from inside that Ubuntu distribution.",
];

/// Show the manual setup and require an explicit yes.
pub fn confirm(p: &Provisioner<'_>) -> StepResult {
    for line in PREREQUISITES {
        p.prompt.info(line);
    }
    p.prompt.info(&format!("Documentation: {ROCM_WSL_DOCS}"));

    if p.prompt
        .confirm("Have you completed these prerequisites?", false)?
    {
        Ok(StepOutcome::Continue)
    } else {
        Err(ProvisionError::PrerequisitesDeclined)
    }
}
