use std::fs;
use std::path::{Path, PathBuf};

use bench_fanout::BenchConfig;

#[test]
fn missing_file_yields_none() {
    assert!(BenchConfig::from_path(Path::new("/nonexistent/bench-fanout.toml")).is_none());
}

#[test]
fn defaults_cover_all_fields() {
    let cfg = BenchConfig::default();
    assert_eq!(cfg.script_runner, PathBuf::from("python"));
    assert_eq!(cfg.device_env, "CUDA_VISIBLE_DEVICES");
    assert!(cfg.launch_args.is_empty());
}

#[test]
fn loads_runner_and_device_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench-fanout.toml");
    fs::write(
        &path,
        "script_runner = \"python3\"\ndevice_env = \"HIP_VISIBLE_DEVICES\"\n",
    )
    .expect("write temp config");
    let cfg = BenchConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.script_runner, PathBuf::from("python3"));
    assert_eq!(cfg.device_env, "HIP_VISIBLE_DEVICES");
}

#[test]
fn launch_args_come_from_their_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench-fanout.toml");
    fs::write(&path, "[launch]\nargs = [\"-u\", \"-W\"]\n").expect("write temp config");
    let cfg = BenchConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.launch_args, vec!["-u".to_string(), "-W".to_string()]);
    assert_eq!(cfg.script_runner, PathBuf::from("python"));
}

#[test]
fn empty_device_env_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench-fanout.toml");
    fs::write(&path, "device_env = \"\"\n").expect("write temp config");
    let cfg = BenchConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.device_env, "CUDA_VISIBLE_DEVICES");
}
