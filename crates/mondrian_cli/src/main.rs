//! Mondrian CLI — the command-line interface for the Mondrian floorplanner.
//!
//! Loads a block/terminal file and a net file, runs the parallel annealing
//! search, and writes the placement report to the output path.

#![warn(missing_docs)]

mod config;
mod solve;

use std::process;

use clap::{Parser, ValueEnum};

/// Mondrian — a parallel sequence-pair floorplanner.
#[derive(Parser, Debug)]
#[command(name = "mondrian", version, about = "Mondrian fixed-outline floorplanner")]
pub struct Cli {
    /// Area/wirelength tradeoff weight in [0, 1]; 1 optimizes area only.
    pub alpha: f64,

    /// Path to the block/terminal description file.
    pub blocks: String,

    /// Path to the net description file.
    pub nets: String,

    /// Path the placement report is written to.
    pub output: String,

    /// Number of parallel search workers (default: available parallelism).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Number of synchronization rounds.
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Wall-clock seconds each worker searches per round.
    #[arg(short, long)]
    pub slice: Option<f64>,

    /// Random seed; worker `i` uses `seed + i`. Default: from entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print per-worker search statistics.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a custom `mondrian.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Line-oriented text dump.
    Text,
    /// Machine-readable JSON.
    Json,
}

fn main() {
    let cli = Cli::parse();
    match solve::run(&cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
