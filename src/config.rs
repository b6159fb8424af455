use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_CONFIG_NAME: &str = "bench-fanout.toml";
const DEFAULT_DEVICE_ENV: &str = "CUDA_VISIBLE_DEVICES";

/// Tool configuration, loaded from an optional TOML file.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Program used to run the benchmark script.
    pub script_runner: PathBuf,
    /// Environment variable that restricts a child to a single device.
    pub device_env: String,
    /// Extra args passed to the runner before the script path.
    pub launch_args: Vec<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            script_runner: PathBuf::from("python"),
            device_env: DEFAULT_DEVICE_ENV.to_string(),
            launch_args: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct BenchConfigFile {
    script_runner: Option<String>,
    device_env: Option<String>,
    launch: Option<LaunchSection>,
}

#[derive(Debug, Deserialize, Default)]
struct LaunchSection {
    args: Option<Vec<String>>,
}

impl BenchConfig {
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("BENCH_FANOUT_CONFIG") {
            let cfg = Self::from_path(Path::new(&path)).unwrap_or_default();
            cfg.warn_if_invalid();
            return cfg;
        }
        let cfg = Self::from_path(Path::new(DEFAULT_CONFIG_NAME)).unwrap_or_default();
        cfg.warn_if_invalid();
        cfg
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let raw = std::fs::read_to_string(path).ok()?;
        let file: BenchConfigFile = toml::from_str(&raw).ok()?;
        Some(Self::from_file(file))
    }

    fn from_file(file: BenchConfigFile) -> Self {
        BenchConfig {
            script_runner: file
                .script_runner
                .map(|v| expand_path(&v))
                .unwrap_or_else(|| PathBuf::from("python")),
            device_env: file
                .device_env
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DEVICE_ENV.to_string()),
            launch_args: file.launch.and_then(|l| l.args).unwrap_or_default(),
        }
    }

    fn warn_if_invalid(&self) {
        if self.script_runner.as_os_str().is_empty() {
            eprintln!("bench config: script_runner is empty; launches will fail");
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let mut out = raw.to_string();
    if let Some(stripped) = out.strip_prefix('~') {
        if let Ok(home) = std::env::var("HOME") {
            out = format!("{home}{stripped}");
        }
    }
    PathBuf::from(expand_env(&out))
}

fn expand_env(input: &str) -> String {
    let mut out = String::new();
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => {
                let key = &rest[start + 2..start + 2 + end];
                match std::env::var(key) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &rest[start + 2 + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
