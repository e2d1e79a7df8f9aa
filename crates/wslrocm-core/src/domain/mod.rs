//! Domain types for a provisioning run.
//!
//! - [`StepId`]: the fixed, ordered list of provisioning steps
//! - [`StepOutcome`]: what a step reports back to the driver loop
//! - [`ConflictChoice`]: the user's answer when the application directory exists
//! - [`ProvisionReport`]: the summary of a run that did not fail

mod choice;
mod report;
mod step;

pub use choice::ConflictChoice;
pub use report::{ProvisionReport, RunStatus, StepWarning};
pub use step::{StepId, StepOutcome};
