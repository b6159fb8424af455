use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;

use crate::config::BenchConfig;
use crate::parse;

/// Everything one launch needs, including the device pin.
///
/// The device index rides here and is applied to the child's environment
/// only; the parent environment is never touched.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub script: PathBuf,
    pub device_index: usize,
    pub runner: PathBuf,
    pub runner_args: Vec<String>,
    pub device_env: String,
}

impl LaunchOptions {
    pub fn new(script: PathBuf, device_index: usize, cfg: &BenchConfig) -> Self {
        Self {
            script,
            device_index,
            runner: cfg.script_runner.clone(),
            runner_args: cfg.launch_args.clone(),
            device_env: cfg.device_env.clone(),
        }
    }
}

/// Outcome of one launch unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchReport {
    pub device_index: usize,
    /// Last reported FPS; `0.0` when nothing was measured.
    pub fps: f64,
    /// False when the child printed no `Running at ... FPS` line at all,
    /// launch failures included.
    pub matched: bool,
}

/// Run the script pinned to one device and parse its throughput line.
///
/// Launch failures, missing readings, and bad numerals all downgrade to a
/// `0.0` report; nothing propagates to the caller.
pub fn launch_on_device(opts: &LaunchOptions) -> LaunchReport {
    println!(
        "Launching '{}' on GPU {} ...",
        opts.script.display(),
        opts.device_index
    );

    let mut block = String::new();
    let combined = match Command::new(&opts.runner)
        .args(&opts.runner_args)
        .arg(&opts.script)
        .env(&opts.device_env, opts.device_index.to_string())
        .output()
    {
        Ok(output) => {
            // Child text is echoed verbatim; stderr follows stdout since the
            // two pipes are captured separately.
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            text
        }
        Err(err) => {
            block.push_str(&format!(
                "failed to launch '{}' on GPU {}: {err}\n",
                opts.script.display(),
                opts.device_index
            ));
            String::new()
        }
    };
    block.push_str(&combined);

    let reading = parse::last_fps(&parse::strip_ansi(&combined));
    let fps = reading.unwrap_or(0.0);
    if reading.is_some() {
        block.push_str(&format!(
            "GPU {} last reported {fps:.2} FPS.\n",
            opts.device_index
        ));
    }
    block.push_str(&format!(
        "Done running '{}' on GPU {}.\n\n",
        opts.script.display(),
        opts.device_index
    ));

    // One write per unit keeps concurrent blocks from interleaving.
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(block.as_bytes());

    LaunchReport {
        device_index: opts.device_index,
        fps,
        matched: reading.is_some(),
    }
}

/// Launch `count` units, one per device index, and collect their reports.
///
/// Full join barrier: nothing is reported until every unit has finished, so
/// a hung child hangs the run.
pub fn run_fanout(
    script: &Path,
    count: usize,
    cfg: &BenchConfig,
) -> BTreeMap<usize, LaunchReport> {
    let handles: Vec<thread::JoinHandle<LaunchReport>> = (0..count)
        .map(|device_index| {
            let opts = LaunchOptions::new(script.to_path_buf(), device_index, cfg);
            thread::spawn(move || launch_on_device(&opts))
        })
        .collect();

    let mut reports = BTreeMap::new();
    for handle in handles {
        if let Ok(report) = handle.join() {
            reports.insert(report.device_index, report);
        }
    }
    reports
}
