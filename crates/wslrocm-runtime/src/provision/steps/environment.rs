//! Steps 5 to 8: the Python virtual environment.

use std::fs;
use std::path::{Component, Path};

use tracing::info;
use wslrocm_core::{
    ProvisionError, StepOutcome,
    ports::{CommandSpec, run_checked},
};

use crate::provision::{ActiveEnvironment, ProvisionContext, Provisioner, StepResult};

pub async fn install_builder(p: &Provisioner<'_>) -> StepResult {
    let spec = CommandSpec::sudo("apt")
        .args(["install", "-y"])
        .arg(&p.config.env_builder_package);
    run_checked(p.runner, &spec).await?;
    Ok(StepOutcome::Continue)
}

const NAME_FIELD: &str = "Environment name";

pub fn prompt_name(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let name = p
        .prompt
        .input("Enter a name for the virtual environment")?
        .trim()
        .to_string();
    check_name(&name)?;
    ctx.env_name = Some(name);
    Ok(StepOutcome::Continue)
}

/// The name must be exactly one plain path component, so the environment
/// always lands directly inside the working directory.
fn check_name(name: &str) -> Result<(), ProvisionError> {
    if name.is_empty() {
        return Err(ProvisionError::EmptyInput { field: NAME_FIELD });
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('/') => Ok(()),
        _ => Err(ProvisionError::InvalidName {
            field: NAME_FIELD,
            value: name.to_string(),
        }),
    }
}

/// Create the environment in the working directory and activate it.
///
/// An existing directory of the same name is only replaced after the
/// operator agrees.
pub async fn create(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let name = ctx
        .env_name
        .clone()
        .ok_or(ProvisionError::EmptyInput { field: NAME_FIELD })?;
    check_name(&name)?;
    let dir = ctx.resolve(&name);

    if dir.exists() {
        let recreate = p.prompt.confirm(
            &format!("Virtual environment '{name}' already exists. Delete and recreate it?"),
            false,
        )?;
        if !recreate {
            return Err(ProvisionError::RecreateDeclined { path: dir });
        }
        fs::remove_dir_all(&dir).map_err(|e| ProvisionError::io("Failed to remove", &dir, e))?;
        info!(path = %dir.display(), "Removed existing virtual environment");
    }

    let cwd = ctx.working_dir.clone();
    run_checked(
        p.runner,
        &CommandSpec::new("python3")
            .args(["-m", "venv", "--system-site-packages"])
            .arg(&name)
            .current_dir(&cwd),
    )
    .await?;
    run_checked(
        p.runner,
        &CommandSpec::new("chmod")
            .args(["-R", "755"])
            .arg(&name)
            .current_dir(&cwd),
    )
    .await?;

    p.prompt
        .info(&format!("Virtual environment ready: {}", dir.display()));
    ctx.environment = Some(ActiveEnvironment::new(dir));
    Ok(StepOutcome::Continue)
}

pub async fn upgrade_pip(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let env = Provisioner::environment(ctx)?;
    let spec = env
        .pip_command(["install", "--upgrade", "pip", "wheel"])
        .current_dir(&ctx.working_dir);
    run_checked(p.runner, &spec).await?;
    Ok(StepOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_accepted() {
        for name in ["rocm-env", "venv.2", ".venv", "env name"] {
            assert!(check_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn names_leaving_the_working_dir_are_rejected() {
        for name in [".", "..", "/", "a/b", "../env", "/tmp/env", "env/"] {
            assert!(
                matches!(check_name(name), Err(ProvisionError::InvalidName { .. })),
                "{name}"
            );
        }
    }
}
