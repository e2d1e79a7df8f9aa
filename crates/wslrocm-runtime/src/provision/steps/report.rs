//! Steps 14 and 16: operator-facing summaries.

use wslrocm_core::StepOutcome;

use crate::provision::{ProvisionContext, Provisioner};

const COMFYUI_URL: &str = "http://127.0.0.1:8188";

pub fn instructions(p: &Provisioner<'_>, ctx: &ProvisionContext) -> StepOutcome {
    let app_dir = ctx.app_dir.clone().unwrap_or_else(|| p.config.app_dir());
    let activate = ctx.environment.as_ref().map_or_else(
        || "source <env>/bin/activate".to_string(),
        |env| format!("source {}", env.bin_dir().join("activate").display()),
    );

    let lines = [
        "To finish setting up ComfyUI:".to_string(),
        format!("  1. {activate}"),
        format!("  2. cd {}", app_dir.display()),
        "  3. Edit requirements.txt and remove the torch, torchvision and torchaudio lines".to_string(),
        "  4. pip install -r requirements.txt".to_string(),
        "  5. python main.py".to_string(),
        format!("  6. Open {COMFYUI_URL} in a browser"),
    ];
    for line in &lines {
        p.prompt.info(line);
    }
    StepOutcome::Continue
}

pub fn success(p: &Provisioner<'_>, ctx: &ProvisionContext) -> StepOutcome {
    p.prompt.info("Installation complete.");
    if let Some(env) = &ctx.environment {
        p.prompt
            .info(&format!("  Virtual environment: {}", env.root.display()));
    }
    if let Some(app_dir) = &ctx.app_dir {
        p.prompt.info(&format!("  ComfyUI: {}", app_dir.display()));
    }
    if let Some(gpu) = &ctx.gpu_name {
        p.prompt.info(&format!("  GPU: {gpu}"));
    }
    StepOutcome::Continue
}
