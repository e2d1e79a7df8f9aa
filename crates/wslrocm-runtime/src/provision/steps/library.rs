//! Steps 4 and 10: the HSA runtime library.

use tracing::{info, warn};
use wslrocm_core::{
    ProvisionError, StepOutcome,
    ports::{CommandSpec, run_checked},
};

use crate::provision::search::{LibraryLookup, files_with_prefix, locate_library};
use crate::provision::{ProvisionContext, Provisioner, StepResult};
use crate::system::pip::parse_show_location;

/// Find the system runtime library and make it world-readable.
pub async fn verify(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let config = p.config;
    let lookup = locate_library(
        &config.runtime_lib_path,
        &config.search_root,
        &config.runtime_lib_stem(),
    );

    let path = match lookup {
        LibraryLookup::Default(path) => path,
        LibraryLookup::Relocated(path) => {
            p.prompt.info(&format!(
                "{} not at {}, using {}",
                config.runtime_lib_name(),
                config.runtime_lib_path.display(),
                path.display()
            ));
            path
        }
        LibraryLookup::Missing { near_matches } => {
            return Err(ProvisionError::LibraryNotFound {
                name: config.runtime_lib_name(),
                default_path: config.runtime_lib_path.clone(),
                search_root: config.search_root.clone(),
                near_matches,
            });
        }
    };

    p.prompt.info(&format!("Runtime library: {}", path.display()));
    ctx.runtime_lib = Some(path.clone());

    if ctx.inspect_only {
        return Ok(StepOutcome::Continue);
    }

    let chmod = CommandSpec::sudo("chmod").arg("755").path_arg(&path);
    match run_checked(p.runner, &chmod).await {
        Ok(_) => Ok(StepOutcome::Continue),
        Err(e) => Ok(StepOutcome::warned(format!(
            "Could not set permissions on {}: {e}",
            path.display()
        ))),
    }
}

/// Delete the runtime library copies bundled inside the torch package so the
/// system library is loaded instead.
pub async fn remove_bundled(p: &Provisioner<'_>, ctx: &mut ProvisionContext) -> StepResult {
    let env = Provisioner::environment(ctx)?;
    let spec = env
        .pip_command(["show", "torch"])
        .current_dir(&ctx.working_dir)
        .capture_output();
    let output = run_checked(p.runner, &spec).await?;

    let Some(location) = parse_show_location(&output.stdout) else {
        return Ok(StepOutcome::warned(
            "`pip show torch` did not report a Location; bundled runtime library left in place",
        ));
    };

    let lib_dir = location.join("torch").join("lib");
    if !lib_dir.is_dir() {
        return Ok(StepOutcome::warned(format!(
            "{} does not exist; nothing to remove",
            lib_dir.display()
        )));
    }

    let prefix = format!("{}.so", p.config.runtime_lib_stem());
    let bundled = files_with_prefix(&lib_dir, &prefix)
        .map_err(|e| ProvisionError::io("Failed to list", &lib_dir, e))?;
    if bundled.is_empty() {
        return Ok(StepOutcome::warned(format!(
            "No {prefix}* files in {}",
            lib_dir.display()
        )));
    }

    let mut warnings = Vec::new();
    for file in &bundled {
        match Provisioner::remove_file_tolerant(file) {
            Some(message) => {
                warn!(path = %file.display(), "Bundled runtime library not removed");
                warnings.push(message);
            }
            None => info!(path = %file.display(), "Removed bundled runtime library"),
        }
    }
    p.prompt.info(&format!(
        "Removed bundled runtime library: {}",
        Provisioner::display_paths(&bundled)
    ));
    Ok(StepOutcome::from_warnings(warnings))
}
