//! Paths command handler.
//!
//! Displays the resolved installer configuration: every URL, path and
//! override the install would use. This is the first thing to check when a
//! `WSLROCM_*` variable does not seem to take effect.

use anyhow::{Context, Result};
use wslrocm_core::InstallerConfig;

pub fn execute(config: &InstallerConfig, json: bool) -> Result<u8> {
    println!("{}", render(config, json)?);
    Ok(0)
}

fn render(config: &InstallerConfig, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(config).context("Failed to serialize configuration")
    } else {
        Ok(config.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> InstallerConfig {
        InstallerConfig::with_home(PathBuf::from("/home/me"))
    }

    #[test]
    fn plain_output_is_key_value() {
        let out = render(&config(), false).unwrap();
        assert!(out.lines().all(|l| l.contains(" = ")));
        assert!(out.contains("app_dir = /home/me/ComfyUI"));
    }

    #[test]
    fn json_output_parses() {
        let out = render(&config(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["home_dir"], "/home/me");
        assert_eq!(value["release"], "6.2.3");
    }
}
