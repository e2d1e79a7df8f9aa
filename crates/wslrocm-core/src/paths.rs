//! Path helpers shared by the provisioning steps.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,
}

/// Resolve the invoking user's home directory.
pub fn resolve_home_dir() -> Result<PathBuf, PathError> {
    dirs::home_dir().ok_or(PathError::NoHomeDir)
}

/// Name used when moving an existing directory aside.
///
/// `ComfyUI` at 2026-10-18 14:30:05 becomes `ComfyUI_backup_20261018_143005`.
pub fn backup_dir_name(base: &str, at: NaiveDateTime) -> String {
    format!("{base}_backup_{}", at.format("%Y%m%d_%H%M%S"))
}

/// First free backup path next to `dir`.
///
/// Two renames within the same second get `_1`, `_2`, ... appended.
pub fn backup_path(dir: &Path, at: NaiveDateTime) -> PathBuf {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = dir.parent().unwrap_or_else(|| Path::new("."));
    let name = backup_dir_name(&base, at);

    let mut candidate = parent.join(&name);
    let mut counter = 1;
    while candidate.exists() {
        candidate = parent.join(format!("{name}_{counter}"));
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn backup_name_carries_date_suffix() {
        assert_eq!(backup_dir_name("ComfyUI", at()), "ComfyUI_backup_20261018_143005");
    }

    #[test]
    fn backup_path_is_a_sibling() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ComfyUI");

        let backup = backup_path(&dir, at());
        assert_eq!(backup, tmp.path().join("ComfyUI_backup_20261018_143005"));
    }

    #[test]
    fn backup_path_skips_taken_names() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ComfyUI");
        std::fs::create_dir(tmp.path().join("ComfyUI_backup_20261018_143005")).unwrap();

        let backup = backup_path(&dir, at());
        assert_eq!(backup, tmp.path().join("ComfyUI_backup_20261018_143005_1"));
    }
}
