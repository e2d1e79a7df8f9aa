//! Host system adapter.
//!
//! [`SystemCommandRunner`] implements `CommandRunner` with `tokio::process`.
//! The sibling modules parse the output of the tools the pipeline queries.

pub mod pip;
pub mod rocminfo;
pub mod torch;

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use wslrocm_core::ports::{CommandError, CommandOutput, CommandRunner, CommandSpec};

/// Runs commands on the local host.
///
/// Uncaptured commands inherit the terminal so `apt`, `sudo` and `git`
/// progress stays visible to the operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!(command = %spec, cwd = ?spec.current_dir, capture = spec.capture, "Running command");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(Stdio::inherit());
        for (key, value) in &spec.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        let spawn_error = |e: std::io::Error| CommandError::Spawn {
            command: spec.to_string(),
            reason: e.to_string(),
        };

        let output = if spec.capture {
            let output = cmd.output().await.map_err(spawn_error)?;
            CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = cmd.status().await.map_err(spawn_error)?;
            CommandOutput {
                code: status.code(),
                ..CommandOutput::default()
            }
        };

        debug!(command = %spec, code = ?output.code, "Command finished");
        Ok(output)
    }

    fn command_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists_with_common_command() {
        let runner = SystemCommandRunner::new();
        assert!(runner.command_exists("sh"));
    }

    #[test]
    fn test_command_exists_with_nonexistent() {
        let runner = SystemCommandRunner::new();
        assert!(!runner.command_exists("definitely_not_a_real_command_12345"));
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let runner = SystemCommandRunner::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo hello; exit 3"])
            .capture_output();

        let output = runner.run(&spec).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn applies_env_and_working_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = SystemCommandRunner::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf '%s %s' \"$WSLROCM_TEST\" \"$(pwd)\""])
            .env("WSLROCM_TEST", "marker")
            .current_dir(tmp.path())
            .capture_output();

        let output = runner.run(&spec).await.unwrap();
        let canonical = tmp.path().canonicalize().unwrap();
        assert_eq!(output.stdout, format!("marker {}", canonical.display()));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let runner = SystemCommandRunner::new();
        let spec = CommandSpec::new("definitely_not_a_real_command_12345").capture_output();

        let err = runner.run(&spec).await.unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
