//! Fake host adapters shared by the provisioning integration tests.
//!
//! [`FakeRunner`] records every command and answers from a rule list. It
//! also mimics the filesystem side effects the pipeline relies on:
//! `python3 -m venv <name>` creates the environment directory and
//! `git clone <repo> <dir>` creates the checkout.

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use wslrocm_core::{
    InstallerConfig, ProvisionFailure, ProvisionReport,
    config::env_keys,
    ports::{CommandError, CommandOutput, CommandRunner, CommandSpec, DownloadError, Downloader},
};
use wslrocm_runtime::{Provisioner, ScriptedPrompt};

pub const GPU_NAME: &str = "AMD Radeon RX 7900 XTX";

pub const ROCMINFO_OUTPUT: &str = "\
*******
Agent 1
*******
  Name:                    CPU
  Device Type:             CPU
*******
Agent 2
*******
  Name:                    gfx1100
  Marketing Name:          AMD Radeon RX 7900 XTX
  Vendor Name:             AMD
  Device Type:             GPU
";

// ── Command runner ─────────────────────────────────────────────────

struct Rule {
    program_suffix: String,
    args: Vec<String>,
    output: CommandOutput,
}

impl Rule {
    fn matches(&self, spec: &CommandSpec) -> bool {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        spec.program.ends_with(&self.program_suffix) && spec.has_args(&args)
    }
}

/// Records commands and replays canned output.
///
/// Rules added later take precedence. Commands without a matching rule
/// succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<CommandSpec>>,
    rules: Mutex<Vec<Rule>>,
    missing: Mutex<HashSet<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, program_suffix: &str, args: &[&str], output: CommandOutput) {
        self.rules.lock().unwrap().push(Rule {
            program_suffix: program_suffix.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            output,
        });
    }

    /// Make `program` unresolvable on PATH.
    pub fn remove_tool(&self, program: &str) {
        self.missing.lock().unwrap().insert(program.to_string());
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands rendered as `program arg...` strings.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    pub fn find(&self, program_suffix: &str, args: &[&str]) -> Option<CommandSpec> {
        self.calls()
            .into_iter()
            .find(|c| c.program.ends_with(program_suffix) && c.has_args(args))
    }

    pub fn ran(&self, program_suffix: &str, args: &[&str]) -> bool {
        self.find(program_suffix, args).is_some()
    }

    pub fn count(&self, program_suffix: &str, args: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.program.ends_with(program_suffix) && c.has_args(args))
            .count()
    }

    fn apply_side_effects(spec: &CommandSpec) {
        let last = spec.args.last().map(PathBuf::from);
        if spec.has_args(&["-m", "venv"]) {
            if let (Some(dir), Some(name)) = (&spec.current_dir, last) {
                fs::create_dir_all(dir.join(name).join("bin")).unwrap();
            }
        } else if spec.program == "git" && spec.has_args(&["clone"]) {
            if let Some(dest) = last {
                fs::create_dir_all(&dest).unwrap();
                fs::write(dest.join("main.py"), b"").unwrap();
            }
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());

        let output = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|rule| rule.matches(spec))
            .map_or_else(|| CommandOutput::ok(""), |rule| rule.output.clone());

        if output.success() {
            Self::apply_side_effects(spec);
        }
        Ok(output)
    }

    fn command_exists(&self, program: &str) -> bool {
        !self.missing.lock().unwrap().contains(program)
    }
}

// ── Downloader ─────────────────────────────────────────────────────

/// Writes a placeholder file for every requested URL.
#[derive(Default)]
pub struct FakeDownloader {
    urls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with HTTP 404 for URLs containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
            fail_on: Some(needle.to_string()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail_on.as_deref().is_some_and(|n| url.contains(n)) {
            return Err(DownloadError::Http {
                url: url.to_string(),
                status: 404,
            });
        }
        fs::write(dest, b"artifact").map_err(|e| DownloadError::Write {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(8)
    }
}

// ── Fixture ────────────────────────────────────────────────────────

/// A throwaway host layout:
///
/// ```text
/// <tmp>/home            home directory, ComfyUI lands here
/// <tmp>/work            working directory the run starts in
/// <tmp>/rocm/lib        search root with the runtime library
/// <tmp>/site-packages   what `pip show torch` reports
/// ```
pub struct Fixture {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub rocm: PathBuf,
    pub site_packages: PathBuf,
    pub config: InstallerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let home = root.join("home");
        let work = root.join("work");
        let rocm = root.join("rocm");
        let site_packages = root.join("site-packages");
        for dir in [&home, &work, &rocm.join("lib"), &site_packages] {
            fs::create_dir_all(dir).unwrap();
        }

        let runtime_lib = rocm.join("lib/libhsa-runtime64.so.1");
        fs::write(&runtime_lib, b"").unwrap();

        let overrides = [
            (env_keys::HOME, home.display().to_string()),
            (env_keys::RUNTIME_LIB, runtime_lib.display().to_string()),
            (env_keys::SEARCH_ROOT, rocm.display().to_string()),
        ];
        let config = InstallerConfig::from_lookup(|key| {
            overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap();

        Self {
            _tmp: tmp,
            home,
            work,
            rocm,
            site_packages,
            config,
        }
    }

    /// Runner answering `rocminfo`, `pip show torch` and the torch GPU probe
    /// the way a working host does.
    pub fn runner(&self) -> FakeRunner {
        let runner = FakeRunner::new();
        runner.respond("rocminfo", &[], CommandOutput::ok(ROCMINFO_OUTPUT));
        runner.respond(
            "bin/python",
            &["show", "torch"],
            CommandOutput::ok(format!(
                "Name: torch\nVersion: 2.3.0+rocm6.2.3\nLocation: {}\n",
                self.site_packages.display()
            )),
        );
        runner.respond(
            "bin/python",
            &["-c"],
            CommandOutput::ok(format!("True\n{GPU_NAME}\n")),
        );
        runner
    }

    pub fn app_dir(&self) -> PathBuf {
        self.home.join("ComfyUI")
    }

    pub fn env_dir(&self, name: &str) -> PathBuf {
        self.work.join(name)
    }

    pub fn installer_path(&self) -> PathBuf {
        self.work.join(self.config.installer_package())
    }

    /// Place runtime library copies inside the fake torch install.
    pub fn bundle_runtime(&self, names: &[&str]) -> Vec<PathBuf> {
        let lib = self.site_packages.join("torch/lib");
        fs::create_dir_all(&lib).unwrap();
        names
            .iter()
            .map(|name| {
                let path = lib.join(name);
                fs::write(&path, b"").unwrap();
                path
            })
            .collect()
    }

    pub async fn run(
        &self,
        runner: &FakeRunner,
        prompt: &ScriptedPrompt,
        downloader: &FakeDownloader,
    ) -> Result<ProvisionReport, ProvisionFailure> {
        Provisioner::new(&self.config, runner, prompt, downloader)
            .run(&self.work)
            .await
    }
}

/// Answers for a run with no existing environment or checkout.
pub fn fresh_answers(env_name: &str) -> Vec<String> {
    vec!["y".to_string(), env_name.to_string()]
}

pub fn saw(prompt: &ScriptedPrompt, needle: &str) -> bool {
    prompt.transcript().iter().any(|line| line.contains(needle))
}
