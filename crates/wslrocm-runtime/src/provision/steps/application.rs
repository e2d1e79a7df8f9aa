//! Steps 11 to 13: the ComfyUI checkout.

use std::fs;

use chrono::Local;
use tracing::info;
use wslrocm_core::{
    ConflictChoice, ProvisionError, StepOutcome, backup_path,
    ports::{CommandSpec, run_checked},
};

use crate::provision::{ProvisionContext, Provisioner, StepResult};

pub fn return_home(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepOutcome {
    ctx.working_dir.clone_from(&p.config.home_dir);
    p.prompt.info(&format!(
        "Working directory: {}",
        ctx.working_dir.display()
    ));
    StepOutcome::Continue
}

/// Ask what to do with an existing application directory until the answer
/// is one of the known choices.
pub fn resolve_conflict(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let app_dir = p.config.app_dir();
    if !app_dir.exists() {
        return Ok(StepOutcome::Continue);
    }

    let question = format!(
        "{} already exists. Type {} to continue",
        app_dir.display(),
        ConflictChoice::KEYWORDS.join(", ")
    );
    let choice = loop {
        let answer = p.prompt.input(&question)?;
        match answer.parse::<ConflictChoice>() {
            Ok(choice) => break choice,
            Err(message) => p.prompt.warn(&message),
        }
    };

    match choice {
        ConflictChoice::Remove => {
            fs::remove_dir_all(&app_dir)
                .map_err(|e| ProvisionError::io("Failed to remove", &app_dir, e))?;
            info!(path = %app_dir.display(), "Removed existing application directory");
            p.prompt.info(&format!("Removed {}", app_dir.display()));
        }
        ConflictChoice::Rename => {
            let backup = backup_path(&app_dir, Local::now().naive_local());
            fs::rename(&app_dir, &backup)
                .map_err(|e| ProvisionError::io("Failed to rename", &app_dir, e))?;
            info!(from = %app_dir.display(), to = %backup.display(), "Moved existing application directory");
            p.prompt.info(&format!(
                "Moved {} to {}",
                app_dir.display(),
                backup.display()
            ));
        }
        ConflictChoice::Exit => {
            p.prompt
                .info("Leaving the existing directory untouched. Exiting.");
            ctx.app_dir = Some(app_dir);
            return Ok(StepOutcome::Stop);
        }
    }
    Ok(StepOutcome::Continue)
}

pub async fn clone(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    if !p.runner.command_exists("git") {
        return Err(ProvisionError::MissingTool {
            command: "git".to_string(),
            hint: "Install it with `sudo apt install -y git` and run again.".to_string(),
        });
    }

    let app_dir = p.config.app_dir();
    run_checked(
        p.runner,
        &CommandSpec::new("git")
            .arg("clone")
            .arg(&p.config.app_repo)
            .path_arg(&app_dir)
            .current_dir(&ctx.working_dir),
    )
    .await?;
    run_checked(
        p.runner,
        &CommandSpec::new("chmod")
            .args(["-R", "755"])
            .path_arg(&app_dir)
            .current_dir(&ctx.working_dir),
    )
    .await?;

    ctx.app_dir = Some(app_dir);
    Ok(StepOutcome::Continue)
}
