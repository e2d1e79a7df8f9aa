//! Filesystem lookups for the HSA runtime library.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Where the runtime library was found, or what looked like it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryLookup {
    /// Present at the configured default path.
    Default(PathBuf),
    /// Found elsewhere under the search root.
    Relocated(PathBuf),
    /// Not found. Files whose names start with the library stem, sorted.
    Missing { near_matches: Vec<PathBuf> },
}

impl LibraryLookup {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Default(p) | Self::Relocated(p) => Some(p),
            Self::Missing { .. } => None,
        }
    }
}

/// Look for the runtime library at `default_path`, then by exact file name
/// anywhere below `search_root`.
///
/// Unreadable directories are skipped and symlinked directories are not
/// followed. Symlinked files count as matches.
pub fn locate_library(default_path: &Path, search_root: &Path, stem: &str) -> LibraryLookup {
    if is_non_dir_entry(default_path) {
        return LibraryLookup::Default(default_path.to_path_buf());
    }

    let Some(name) = default_path.file_name() else {
        return LibraryLookup::Missing {
            near_matches: Vec::new(),
        };
    };

    let files = collect_files(search_root);
    if let Some(found) = files.iter().find(|p| p.file_name() == Some(name)) {
        return LibraryLookup::Relocated(found.clone());
    }

    let mut near_matches: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(stem))
        })
        .collect();
    near_matches.sort();
    LibraryLookup::Missing { near_matches }
}

/// Non-directory entries of `dir` whose names start with `prefix`, sorted.
///
/// A missing directory is an empty result.
pub fn files_with_prefix(dir: &Path, prefix: &str) -> std::io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

fn is_non_dir_entry(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| !m.is_dir())
}

fn collect_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}
