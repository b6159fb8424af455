use std::process::Command;

/// Reports how many accelerator devices a launch may fan out over.
pub trait DeviceProbe {
    fn device_count(&self) -> usize;
}

#[cfg(feature = "gpu-nvidia")]
pub struct NvmlProbe;

/// Counts devices by asking `nvidia-smi` for one name line per GPU.
pub struct SmiProbe;

#[cfg(feature = "gpu-nvidia")]
impl DeviceProbe for NvmlProbe {
    fn device_count(&self) -> usize {
        use nvml_wrapper::Nvml;

        Nvml::init()
            .and_then(|nvml| nvml.device_count())
            .map(|n| n as usize)
            .unwrap_or(0)
    }
}

impl DeviceProbe for SmiProbe {
    fn device_count(&self) -> usize {
        let output = match Command::new("nvidia-smi")
            .args(["--query-gpu=name", "--format=csv,noheader"])
            .output()
        {
            Ok(output) => output,
            Err(_) => return 0,
        };
        if !output.status.success() {
            return 0;
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
    }
}

pub fn platform_probe() -> Box<dyn DeviceProbe> {
    #[cfg(feature = "gpu-nvidia")]
    {
        if NvmlProbe.device_count() > 0 {
            return Box::new(NvmlProbe);
        }
    }
    Box::new(SmiProbe)
}

/// Number of devices available to this run.
///
/// A device mask already present in the parent environment wins over the
/// probes, matching how the accelerator runtime itself reports availability
/// under that mask.
pub fn available_devices(device_env: &str, probe: &dyn DeviceProbe) -> usize {
    if let Ok(mask) = std::env::var(device_env) {
        return mask_entry_count(&mask);
    }
    probe.device_count()
}

fn mask_entry_count(mask: &str) -> usize {
    mask.split(',').filter(|entry| !entry.trim().is_empty()).count()
}

/// Clamp the requested device count to what is actually available.
pub fn clamp_requested(requested: Option<usize>, available: usize) -> usize {
    match requested {
        Some(n) if n <= available => n,
        _ => available,
    }
}
