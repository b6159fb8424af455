pub mod config;
pub mod device;
pub mod launch;
pub mod parse;

pub use config::BenchConfig;
pub use launch::{run_fanout, LaunchOptions, LaunchReport};
