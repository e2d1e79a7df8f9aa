//! External command execution port.
//!
//! Every package-manager, diagnostic and version-control invocation goes
//! through [`CommandRunner`], so tests can substitute a fake host.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Description of one external process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables, applied on top of the inherited environment.
    pub envs: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
    /// Capture stdout/stderr instead of streaming them to the terminal.
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// `sudo <program> <args...>`.
    pub fn sudo(program: impl Into<String>) -> Self {
        Self::new("sudo").arg(program)
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    /// True when `needle` appears as a contiguous run inside the argument list.
    pub fn has_args(&self, needle: &[&str]) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.args
            .windows(needle.len())
            .any(|window| window.iter().zip(needle).all(|(a, b)| a == b))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Exit status and (when captured) output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful exit with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed exit with the given code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Last non-empty stderr line, falling back to stdout.
    pub fn summary(&self) -> String {
        let last = |text: &str| {
            text.lines()
                .rev()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string)
        };
        last(&self.stderr)
            .or_else(|| last(&self.stdout))
            .unwrap_or_default()
    }
}

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started at all.
    #[error("Failed to run `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The process ran and exited unsuccessfully.
    #[error("`{command}` exited with {status}{suffix}", suffix = detail_suffix(.detail))]
    Failed {
        command: String,
        status: String,
        detail: String,
    },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

impl CommandError {
    pub fn failed(spec: &CommandSpec, output: &CommandOutput) -> Self {
        Self::Failed {
            command: spec.to_string(),
            status: output
                .code
                .map_or_else(|| "signal".to_string(), |c| format!("code {c}")),
            detail: output.summary(),
        }
    }
}

/// Port for running external processes on the host.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion.
    ///
    /// A non-zero exit is reported in [`CommandOutput::code`], not as an error;
    /// `Err` means the process could not be run.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;

    /// Whether `program` resolves on `PATH`.
    fn command_exists(&self, program: &str) -> bool;
}

/// Run a command and turn a non-zero exit into [`CommandError::Failed`].
pub async fn run_checked(
    runner: &dyn CommandRunner,
    spec: &CommandSpec,
) -> Result<CommandOutput, CommandError> {
    let output = runner.run(spec).await?;
    if output.success() {
        Ok(output)
    } else {
        Err(CommandError::failed(spec, &output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_args_and_env() {
        let spec = CommandSpec::sudo("apt")
            .args(["install", "-y"])
            .arg("python3-venv")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .current_dir("/home/me");

        assert_eq!(spec.program, "sudo");
        assert_eq!(spec.args, ["apt", "install", "-y", "python3-venv"]);
        assert_eq!(
            spec.envs,
            vec![("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())]
        );
        assert_eq!(spec.current_dir, Some(PathBuf::from("/home/me")));
        assert!(!spec.capture);
    }

    #[test]
    fn display_quotes_args_with_spaces() {
        let spec = CommandSpec::new("python").args(["-c", "import torch; print(1)"]);
        assert_eq!(spec.to_string(), "python -c \"import torch; print(1)\"");
    }

    #[test]
    fn has_args_matches_contiguous_runs() {
        let spec = CommandSpec::new("python").args(["-m", "pip", "show", "torch"]);
        assert!(spec.has_args(&["pip", "show"]));
        assert!(!spec.has_args(&["pip", "torch"]));
        assert!(spec.has_args(&[]));
    }

    #[test]
    fn summary_prefers_last_stderr_line() {
        let output = CommandOutput {
            code: Some(100),
            stdout: "Reading package lists...".into(),
            stderr: "E: Unable to locate package\n\n".into(),
        };
        assert_eq!(output.summary(), "E: Unable to locate package");
        assert_eq!(CommandOutput::ok("done\n").summary(), "done");
    }

    #[test]
    fn failed_error_names_command_and_status() {
        let spec = CommandSpec::sudo("apt").arg("update");
        let err = CommandError::failed(&spec, &CommandOutput::failed(100, "E: no network"));
        assert_eq!(
            err.to_string(),
            "`sudo apt update` exited with code 100: E: no network"
        );

        let killed = CommandOutput {
            code: None,
            ..CommandOutput::default()
        };
        let err = CommandError::failed(&spec, &killed);
        assert_eq!(err.to_string(), "`sudo apt update` exited with signal");
    }
}
