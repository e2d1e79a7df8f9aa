//! Mutable state threaded through the provisioning steps.

use std::path::{Path, PathBuf};

use wslrocm_core::ports::CommandSpec;

/// State shared between steps of one run.
///
/// The process working directory is never changed; commands and relative
/// paths are resolved against [`ProvisionContext::working_dir`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionContext {
    pub working_dir: PathBuf,
    pub env_name: Option<String>,
    pub environment: Option<ActiveEnvironment>,
    pub runtime_lib: Option<PathBuf>,
    pub gpu_name: Option<String>,
    pub app_dir: Option<PathBuf>,
    /// Skip every mutation of the host (used by `check-gpu`).
    pub inspect_only: bool,
}

impl ProvisionContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            env_name: None,
            environment: None,
            runtime_lib: None,
            gpu_name: None,
            app_dir: None,
            inspect_only: false,
        }
    }

    /// Context for read-only host checks.
    pub fn inspect(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            inspect_only: true,
            ..Self::new(working_dir)
        }
    }

    /// Resolve `name` against the working directory.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        self.working_dir.join(name)
    }
}

/// A virtual environment that subsequent commands run inside.
///
/// Activation is expressed on each command: the environment's interpreter
/// is invoked directly and `VIRTUAL_ENV` plus `PATH` are set the way the
/// `activate` script would set them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEnvironment {
    pub root: PathBuf,
    /// `PATH` of the parent process, prefixed with the environment's `bin`.
    path_var: String,
}

impl ActiveEnvironment {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let bin = root.join("bin");
        let path_var = match std::env::var("PATH") {
            Ok(path) if !path.is_empty() => format!("{}:{path}", bin.display()),
            _ => bin.display().to_string(),
        };
        Self { root, path_var }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn python(&self) -> PathBuf {
        self.bin_dir().join("python")
    }

    /// `<env>/bin/python <args...>` with the environment applied.
    pub fn python_command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(CommandSpec::new(self.python().to_string_lossy()).args(args))
    }

    /// `<env>/bin/python -m pip <args...>`.
    pub fn pip_command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.python_command(["-m", "pip"]).args(args)
    }

    /// Add `VIRTUAL_ENV` and `PATH` to `spec`.
    pub fn apply(&self, spec: CommandSpec) -> CommandSpec {
        spec.env("VIRTUAL_ENV", self.root.to_string_lossy())
            .env("PATH", self.path_var.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_runs_through_environment_interpreter() {
        let env = ActiveEnvironment::new("/home/user/rocm-env");
        let spec = env.pip_command(["install", "--upgrade", "pip", "wheel"]);

        assert_eq!(spec.program, "/home/user/rocm-env/bin/python");
        assert!(spec.has_args(&["-m", "pip", "install", "--upgrade", "pip", "wheel"]));
        assert!(
            spec.envs
                .contains(&("VIRTUAL_ENV".to_string(), "/home/user/rocm-env".to_string()))
        );
    }

    #[test]
    fn path_starts_with_environment_bin() {
        let env = ActiveEnvironment::new("/home/user/rocm-env");
        let spec = env.python_command(["-c", "pass"]);
        let path = spec
            .envs
            .iter()
            .find(|(k, _)| k == "PATH")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert!(path.starts_with("/home/user/rocm-env/bin"));
    }

    #[test]
    fn inspect_context_is_read_only() {
        let ctx = ProvisionContext::inspect("/tmp");
        assert!(ctx.inspect_only);
        assert_eq!(ctx.resolve("rocm-env"), PathBuf::from("/tmp/rocm-env"));
    }
}
