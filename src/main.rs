use std::path::PathBuf;

use bench_fanout::config::BenchConfig;
use bench_fanout::device::{available_devices, clamp_requested, platform_probe};
use bench_fanout::launch::run_fanout;
use bench_fanout::parse::group_thousands;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run a benchmark script once per GPU in parallel and report the parsed FPS"
)]
struct Args {
    /// Script that prints lines containing 'Running at XXX FPS'.
    #[arg(long)]
    script: PathBuf,
    /// Number of GPUs to use (defaults to all detected; clamped to availability).
    #[arg(long)]
    gpus: Option<usize>,
    /// Emit a machine-readable JSON summary after the report.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = BenchConfig::load();

    let probe = platform_probe();
    let available = available_devices(&cfg.device_env, probe.as_ref());
    if available == 0 {
        println!("No GPU(s) detected; nothing to launch.\n");
    }
    let count = clamp_requested(args.gpus, available);

    let reports = run_fanout(&args.script, count, &cfg);

    let aggregate = count
        .checked_sub(1)
        .and_then(|last_idx| reports.get(&last_idx))
        .map(|last| last.fps * count as f64);
    match aggregate {
        Some(value) => println!(
            "\nLast GPU's FPS × Number of GPUs ≈ {} FPS\n",
            group_thousands(value)
        ),
        None => println!("\nNo FPS values were collected from any process.\n"),
    }

    if args.json {
        let results: Vec<serde_json::Value> = reports
            .values()
            .map(|r| {
                serde_json::json!({
                    "gpu": r.device_index,
                    "fps": r.fps,
                    "matched": r.matched,
                })
            })
            .collect();
        let summary = serde_json::json!({
            "gpus": count,
            "results": results,
            "aggregate_fps": aggregate,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
