//! `pip` output parsing.

use std::path::PathBuf;

/// Extract the `Location:` field from `pip show <package>` output.
pub fn parse_show_location(output: &str) -> Option<PathBuf> {
    output.lines().find_map(|line| {
        let value = line.strip_prefix("Location:")?.trim();
        (!value.is_empty()).then(|| PathBuf::from(value))
    })
}

/// Packages `pip uninstall` skipped because they were not installed.
pub fn skipped_packages(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("WARNING: Skipping ")?;
            let (name, _) = rest.split_once(" as it is not installed")?;
            Some(name.to_string())
        })
        .collect()
}
