//! Installer configuration.
//!
//! Every value the provisioning steps need (release identifiers, download
//! locations, library paths, repository URL) lives in [`InstallerConfig`].
//! The configuration is built once at startup and never mutated afterwards.
//!
//! # Resolution
//!
//! Defaults come from the constants in this module. Each of the `WSLROCM_*`
//! variables listed in [`env_keys`] overrides one field. Lookups go through a
//! caller-supplied function so tests never have to touch the process
//! environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::paths::{PathError, resolve_home_dir};

/// Ubuntu release the installer packages are built for (22.04).
pub const DEFAULT_UBUNTU_CODENAME: &str = "jammy";

/// Flags passed to `amdgpu-install` for a WSL-only user-space install.
pub const DEFAULT_INSTALLER_FLAGS: &[&str] = &["-y", "--usecase=wsl,rocm", "--no-dkms"];

/// Diagnostic tool shipped with ROCm that enumerates compute agents.
pub const DEFAULT_DIAGNOSTIC_COMMAND: &str = "rocminfo";

/// Vendor string expected in the diagnostic output.
pub const DEFAULT_VENDOR_PATTERN: &str = "AMD";

/// Well-known location of the HSA runtime library.
pub const DEFAULT_RUNTIME_LIB: &str = "/opt/rocm/lib/libhsa-runtime64.so.1";

/// Root searched when the runtime library is not at its default location.
pub const DEFAULT_SEARCH_ROOT: &str = "/opt/rocm";

/// OS package providing `python3 -m venv`.
pub const DEFAULT_ENV_BUILDER_PACKAGE: &str = "python3-venv";

/// Canonical ComfyUI repository.
pub const DEFAULT_APP_REPO: &str = "https://github.com/comfyanonymous/ComfyUI.git";

/// Directory name of the cloned application, relative to the home directory.
pub const DEFAULT_APP_DIR: &str = "ComfyUI";

/// Documentation for installing ROCm under WSL.
pub const ROCM_WSL_DOCS: &str =
    "https://rocm.docs.amd.com/projects/radeon/en/latest/docs/install/wsl/install-radeon.html";

const INSTALLER_BASE_URL: &str = "https://repo.radeon.com/amdgpu-install";
const WHEEL_BASE_URL: &str = "https://repo.radeon.com/rocm/manylinux";

/// Names of the environment variables that override configuration fields.
pub mod env_keys {
    pub const ROCM_RELEASE: &str = "WSLROCM_ROCM_RELEASE";
    pub const UBUNTU_CODENAME: &str = "WSLROCM_UBUNTU_CODENAME";
    pub const RUNTIME_LIB: &str = "WSLROCM_RUNTIME_LIB";
    pub const SEARCH_ROOT: &str = "WSLROCM_SEARCH_ROOT";
    pub const APP_REPO: &str = "WSLROCM_APP_REPO";
    pub const APP_DIR: &str = "WSLROCM_APP_DIR";
    pub const HOME: &str = "WSLROCM_HOME";
}

/// Errors raised while building the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported ROCm release '{0}' (supported: {supported})", supported = RocmRelease::supported_list())]
    UnsupportedRelease(String),

    #[error("{key} is set but empty")]
    EmptyValue { key: &'static str },

    #[error("{key} must be an absolute path, got '{value}'")]
    RelativePath { key: &'static str, value: String },

    #[error("{key} must be a single directory name, got '{value}'")]
    InvalidDirName { key: &'static str, value: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// A prebuilt PyTorch-family wheel published for one ROCm release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WheelArtifact {
    /// Distribution name as `pip` knows it.
    pub package: &'static str,
    /// File name on the wheel server.
    pub file_name: &'static str,
}

const WHEELS_6_1_3: [WheelArtifact; 4] = [
    WheelArtifact {
        package: "torch",
        file_name: "torch-2.1.2+rocm6.1.3-cp310-cp310-linux_x86_64.whl",
    },
    WheelArtifact {
        package: "torchvision",
        file_name: "torchvision-0.16.1+rocm6.1.3-cp310-cp310-linux_x86_64.whl",
    },
    WheelArtifact {
        package: "pytorch-triton-rocm",
        file_name: "pytorch_triton_rocm-2.1.0+rocm6.1.3.4d510c3a44-cp310-cp310-linux_x86_64.whl",
    },
    WheelArtifact {
        package: "torchaudio",
        file_name: "torchaudio-2.1.2+rocm6.1.3-cp310-cp310-linux_x86_64.whl",
    },
];

const WHEELS_6_2_3: [WheelArtifact; 4] = [
    WheelArtifact {
        package: "torch",
        file_name: "torch-2.3.0+rocm6.2.3-cp310-cp310-linux_x86_64.whl",
    },
    WheelArtifact {
        package: "torchvision",
        file_name: "torchvision-0.18.0+rocm6.2.3-cp310-cp310-linux_x86_64.whl",
    },
    WheelArtifact {
        package: "pytorch-triton-rocm",
        file_name: "pytorch_triton_rocm-2.3.0+rocm6.2.3.5a02332983-cp310-cp310-linux_x86_64.whl",
    },
    WheelArtifact {
        package: "torchaudio",
        file_name: "torchaudio-2.3.0+rocm6.2.3-cp310-cp310-linux_x86_64.whl",
    },
];

/// ROCm releases with a published WSL installer and matching wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RocmRelease {
    #[serde(rename = "6.1.3")]
    V6_1_3,
    #[default]
    #[serde(rename = "6.2.3")]
    V6_2_3,
}

impl RocmRelease {
    pub const ALL: [Self; 2] = [Self::V6_1_3, Self::V6_2_3];

    /// Dotted release identifier, as used in repository URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V6_1_3 => "6.1.3",
            Self::V6_2_3 => "6.2.3",
        }
    }

    /// File name of the `amdgpu-install` package for this release.
    pub const fn installer_package(self) -> &'static str {
        match self {
            Self::V6_1_3 => "amdgpu-install_6.1.60103-1_all.deb",
            Self::V6_2_3 => "amdgpu-install_6.2.60203-1_all.deb",
        }
    }

    /// The four framework wheels built against this release.
    pub const fn wheels(self) -> &'static [WheelArtifact; 4] {
        match self {
            Self::V6_1_3 => &WHEELS_6_1_3,
            Self::V6_2_3 => &WHEELS_6_2_3,
        }
    }

    fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RocmRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RocmRelease {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ConfigError::UnsupportedRelease(s.to_string()))
    }
}

/// Complete configuration for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallerConfig {
    pub release: RocmRelease,
    pub ubuntu_codename: String,
    pub installer_flags: Vec<String>,
    pub diagnostic_command: String,
    pub vendor_pattern: String,
    pub runtime_lib_path: PathBuf,
    pub search_root: PathBuf,
    pub env_builder_package: String,
    pub app_repo: String,
    pub app_dir_name: String,
    pub home_dir: PathBuf,
}

impl InstallerConfig {
    /// Build the configuration with every default applied.
    pub fn with_home(home_dir: PathBuf) -> Self {
        Self {
            release: RocmRelease::default(),
            ubuntu_codename: DEFAULT_UBUNTU_CODENAME.to_string(),
            installer_flags: DEFAULT_INSTALLER_FLAGS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            diagnostic_command: DEFAULT_DIAGNOSTIC_COMMAND.to_string(),
            vendor_pattern: DEFAULT_VENDOR_PATTERN.to_string(),
            runtime_lib_path: PathBuf::from(DEFAULT_RUNTIME_LIB),
            search_root: PathBuf::from(DEFAULT_SEARCH_ROOT),
            env_builder_package: DEFAULT_ENV_BUILDER_PACKAGE.to_string(),
            app_repo: DEFAULT_APP_REPO.to_string(),
            app_dir_name: DEFAULT_APP_DIR.to_string(),
            home_dir,
        }
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration, resolving overrides through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(key) {
                None => Ok(None),
                Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue { key }),
                Some(value) => {
                    debug!(key, value = %value, "Applying configuration override");
                    Ok(Some(value.trim().to_string()))
                }
            }
        };

        let home_dir = match read(env_keys::HOME)? {
            Some(home) => absolute(env_keys::HOME, home)?,
            None => resolve_home_dir()?,
        };

        let mut config = Self::with_home(home_dir);

        if let Some(release) = read(env_keys::ROCM_RELEASE)? {
            config.release = release.parse()?;
        }
        if let Some(codename) = read(env_keys::UBUNTU_CODENAME)? {
            config.ubuntu_codename = codename;
        }
        if let Some(lib) = read(env_keys::RUNTIME_LIB)? {
            config.runtime_lib_path = absolute(env_keys::RUNTIME_LIB, lib)?;
        }
        if let Some(root) = read(env_keys::SEARCH_ROOT)? {
            config.search_root = absolute(env_keys::SEARCH_ROOT, root)?;
        }
        if let Some(repo) = read(env_keys::APP_REPO)? {
            config.app_repo = repo;
        }
        if let Some(dir) = read(env_keys::APP_DIR)? {
            if dir.contains('/') || dir == "." || dir == ".." {
                return Err(ConfigError::InvalidDirName {
                    key: env_keys::APP_DIR,
                    value: dir,
                });
            }
            config.app_dir_name = dir;
        }

        Ok(config)
    }

    /// File name of the driver-stack installer package.
    pub const fn installer_package(&self) -> &'static str {
        self.release.installer_package()
    }

    /// Download URL of the driver-stack installer package.
    pub fn installer_url(&self) -> String {
        format!(
            "{INSTALLER_BASE_URL}/{release}/ubuntu/{codename}/{package}",
            release = self.release,
            codename = self.ubuntu_codename,
            package = self.installer_package()
        )
    }

    /// The framework wheels for the configured release.
    pub const fn wheels(&self) -> &'static [WheelArtifact; 4] {
        self.release.wheels()
    }

    /// Download URL of one wheel. `+` in local version tags is percent-encoded.
    pub fn wheel_url(&self, wheel: &WheelArtifact) -> String {
        format!(
            "{WHEEL_BASE_URL}/rocm-rel-{release}/{file}",
            release = self.release,
            file = wheel.file_name.replace('+', "%2B")
        )
    }

    /// File name of the runtime library (`libhsa-runtime64.so.1`).
    pub fn runtime_lib_name(&self) -> String {
        self.runtime_lib_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Library name without its `.so` suffix (`libhsa-runtime64`).
    ///
    /// Used to report near matches and to spot bundled copies.
    pub fn runtime_lib_stem(&self) -> String {
        let name = self.runtime_lib_name();
        match name.find(".so") {
            Some(idx) => name[..idx].to_string(),
            None => name,
        }
    }

    /// Where the application repository is cloned.
    pub fn app_dir(&self) -> PathBuf {
        self.home_dir.join(&self.app_dir_name)
    }
}

fn absolute(key: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    if Path::new(&value).is_absolute() {
        Ok(PathBuf::from(value))
    } else {
        Err(ConfigError::RelativePath { key, value })
    }
}

impl fmt::Display for InstallerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rocm_release = {}", self.release)?;
        writeln!(f, "ubuntu_codename = {}", self.ubuntu_codename)?;
        writeln!(f, "installer_url = {}", self.installer_url())?;
        writeln!(f, "installer_flags = {}", self.installer_flags.join(" "))?;
        writeln!(f, "runtime_lib = {}", self.runtime_lib_path.display())?;
        writeln!(f, "search_root = {}", self.search_root.display())?;
        for wheel in self.wheels() {
            writeln!(f, "wheel.{} = {}", wheel.package, self.wheel_url(wheel))?;
        }
        writeln!(f, "app_repo = {}", self.app_repo)?;
        writeln!(f, "app_dir = {}", self.app_dir().display())?;
        write!(f, "home_dir = {}", self.home_dir.display())
    }
}
