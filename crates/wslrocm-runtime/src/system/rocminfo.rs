//! `rocminfo` output parsing.
//!
//! `rocminfo` prints one block per HSA agent:
//!
//! ```text
//! *******
//! Agent 2
//! *******
//!   Name:                    gfx1100
//!   Marketing Name:          AMD Radeon RX 7900 XTX
//!   Vendor Name:             AMD
//!   Device Type:             GPU
//! ```
//!
//! Agents also carry nested pool and ISA sections that reuse the `Name:` key,
//! so only the first occurrence of each key inside an agent block is kept.

/// One HSA agent reported by `rocminfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RocmAgent {
    pub name: Option<String>,
    pub marketing_name: Option<String>,
    pub vendor: Option<String>,
    pub device_type: Option<String>,
}

impl RocmAgent {
    pub fn is_gpu(&self) -> bool {
        self.device_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("GPU"))
    }
}

/// Parsed `rocminfo` report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RocmInfo {
    pub agents: Vec<RocmAgent>,
}

impl RocmInfo {
    pub fn gpus(&self) -> impl Iterator<Item = &RocmAgent> {
        self.agents.iter().filter(|a| a.is_gpu())
    }

    /// Marketing name of the first GPU agent, falling back to its ISA name.
    pub fn primary_gpu_name(&self) -> Option<&str> {
        self.gpus()
            .find_map(|a| a.marketing_name.as_deref().or(a.name.as_deref()))
    }
}

/// Whether the diagnostic output mentions the expected vendor at all.
pub fn mentions_vendor(output: &str, pattern: &str) -> bool {
    output.contains(pattern)
}

pub fn parse_rocminfo(output: &str) -> RocmInfo {
    let mut agents = Vec::new();
    let mut current: Option<RocmAgent> = None;

    for line in output.lines() {
        let trimmed = line.trim();

        if is_agent_header(trimmed) {
            if let Some(agent) = current.take() {
                agents.push(agent);
            }
            current = Some(RocmAgent::default());
            continue;
        }

        let Some(agent) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let slot = match key.trim() {
            "Name" => &mut agent.name,
            "Marketing Name" => &mut agent.marketing_name,
            "Vendor Name" => &mut agent.vendor,
            "Device Type" => &mut agent.device_type,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    if let Some(agent) = current {
        agents.push(agent);
    }

    RocmInfo { agents }
}

fn is_agent_header(line: &str) -> bool {
    line.strip_prefix("Agent ")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
WSL environment detected.
=====================
HSA System Attributes
=====================
Runtime Version:         1.1
==========
HSA Agents
==========
*******
Agent 1
*******
  Name:                    CPU
  Marketing Name:          CPU
  Vendor Name:             CPU
  Device Type:             CPU
*******
Agent 2
*******
  Name:                    gfx1100
  Marketing Name:          AMD Radeon RX 7900 XTX
  Vendor Name:             AMD
  Feature:                 KERNEL_DISPATCH
  Device Type:             GPU
  ISA Info:
    ISA 1
      Name:                    amdgcn-amd-amdhsa--gfx1100
*** Done ***
";

    #[test]
    fn parses_every_agent_block() {
        let info = parse_rocminfo(SAMPLE);
        assert_eq!(info.agents.len(), 2);
        assert_eq!(info.agents[0].device_type.as_deref(), Some("CPU"));
    }

    #[test]
    fn nested_name_does_not_overwrite_agent_name() {
        let info = parse_rocminfo(SAMPLE);
        assert_eq!(info.agents[1].name.as_deref(), Some("gfx1100"));
    }

    #[test]
    fn primary_gpu_uses_marketing_name() {
        let info = parse_rocminfo(SAMPLE);
        assert_eq!(info.primary_gpu_name(), Some("AMD Radeon RX 7900 XTX"));
        assert_eq!(info.gpus().count(), 1);
    }

    #[test]
    fn no_agents_without_headers() {
        let info = parse_rocminfo("ROCk module is NOT loaded\n");
        assert!(info.agents.is_empty());
        assert!(info.primary_gpu_name().is_none());
    }

    #[test]
    fn vendor_match_is_a_substring_check() {
        assert!(mentions_vendor(SAMPLE, "AMD"));
        assert!(!mentions_vendor("HSA_STATUS_ERROR_OUT_OF_RESOURCES", "AMD"));
    }
}
