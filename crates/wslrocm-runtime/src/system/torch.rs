//! PyTorch GPU probe.

/// Python snippet run inside the virtual environment.
///
/// Prints `True`/`False` on the first line and the device name (or an empty
/// line) on the second.
pub const GPU_PROBE_SCRIPT: &str = "import torch; available = torch.cuda.is_available(); \
print(available); print(torch.cuda.get_device_name(0) if available else '')";

/// Result of [`GPU_PROBE_SCRIPT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuProbe {
    pub available: bool,
    pub device_name: Option<String>,
}

/// Parse the probe output.
///
/// Lines before the `True`/`False` marker are ignored, since some ROCm builds
/// print banners on stdout. A missing marker reads as unavailable.
pub fn parse_gpu_probe(output: &str) -> GpuProbe {
    let mut lines = output.lines().map(str::trim);
    let Some(marker) = lines.find(|l| *l == "True" || *l == "False") else {
        return GpuProbe::default();
    };
    if marker == "False" {
        return GpuProbe::default();
    }

    GpuProbe {
        available: true,
        device_name: lines
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_with_device_name() {
        let probe = parse_gpu_probe("True\nAMD Radeon RX 7900 XTX\n");
        assert!(probe.available);
        assert_eq!(probe.device_name.as_deref(), Some("AMD Radeon RX 7900 XTX"));
    }

    #[test]
    fn unavailable() {
        assert_eq!(parse_gpu_probe("False\n\n"), GpuProbe::default());
    }

    #[test]
    fn banner_lines_are_skipped() {
        let probe = parse_gpu_probe("WSL environment detected.\nTrue\nRadeon\n");
        assert!(probe.available);
        assert_eq!(probe.device_name.as_deref(), Some("Radeon"));
    }

    #[test]
    fn garbage_reads_as_unavailable() {
        assert!(!parse_gpu_probe("Traceback (most recent call last):").available);
    }
}
