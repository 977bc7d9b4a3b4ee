//! The solve pipeline: load, search, report.

use std::path::Path;
use std::time::{Duration, Instant};

use mondrian_common::WarningSink;
use mondrian_engine::{Coordinator, PlacementReport, Schedule};
use mondrian_model::{load_blocks_file, load_nets_file};

use crate::{config, Cli, ReportFormat};

/// Synchronization rounds when neither flag nor config file says otherwise.
const DEFAULT_ROUNDS: u32 = 10;

/// Per-worker wall-clock seconds per round when not configured.
const DEFAULT_SLICE_SECS: f64 = 28.5;

/// Runs the full pipeline and returns the process exit code.
///
/// An infeasible instance is a valid outcome, not an error: the report is
/// still written and the exit code is 0.
pub fn run(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.alpha) {
        return Err(format!("alpha must be in [0, 1], got {}", cli.alpha).into());
    }

    let file_config = match &cli.config {
        Some(path) => config::load_config(Path::new(path))?,
        None => config::FileConfig::default(),
    };
    let search = file_config.search;

    let workers = cli.workers.or(search.workers).unwrap_or_else(default_workers);
    let rounds = cli.rounds.or(search.rounds).unwrap_or(DEFAULT_ROUNDS);
    let slice_secs = cli.slice.or(search.slice_secs).unwrap_or(DEFAULT_SLICE_SECS);
    let seed = cli.seed.or(search.seed).unwrap_or_else(rand::random);

    let sink = WarningSink::new();
    let mut plan = load_blocks_file(Path::new(&cli.blocks), &sink)?;
    load_nets_file(Path::new(&cli.nets), &mut plan, &sink)?;
    if !cli.quiet {
        for warning in sink.take_all() {
            eprintln!("warning: {warning}");
        }
    }

    let start = Instant::now();
    let mut coordinator = Coordinator::new(
        &plan,
        cli.alpha,
        Schedule::default(),
        workers,
        rounds,
        Duration::from_secs_f64(slice_secs),
        seed,
    );
    coordinator.initialize();
    let (winner, cost) = coordinator.run();
    let elapsed = start.elapsed();

    let report = PlacementReport::from_annealer(coordinator.worker_mut(winner), cost, elapsed);
    let rendered = match cli.format {
        ReportFormat::Text => report.to_text(),
        ReportFormat::Json => report.to_json(),
    };
    std::fs::write(&cli.output, rendered)?;

    if !cli.quiet {
        match report.cost {
            Some(cost) => println!(
                "cost {cost:.0}  area {}  extents {} x {}  wirelength {}  elapsed {:.1}s",
                report.area, report.len_x, report.len_y, report.wirelength, report.elapsed_secs
            ),
            None => println!(
                "no feasible placement found within the outline (elapsed {:.1}s)",
                report.elapsed_secs
            ),
        }
    }
    if cli.verbose {
        for i in 0..coordinator.worker_count() {
            let stats = coordinator.worker(i).stats();
            eprintln!(
                "worker {i}: {} trials, {} accepted ({} uphill), {} rejected, {} reforges",
                stats.trials, stats.accepted, stats.uphill, stats.rejected, stats.reforges
            );
        }
    }

    Ok(0)
}

/// One worker per available hardware thread.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const BLOCKS: &str = "\
Outline: 4 4
NumBlocks: 2
NumTerminals: 0
a 2 2
b 2 2
";

    const NETS: &str = "\
NumNets: 1
NetDegree: 2
a
b
";

    fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        path.to_str().unwrap().to_string()
    }

    fn quick_cli(dir: &TempDir, format: ReportFormat) -> Cli {
        Cli {
            alpha: 1.0,
            blocks: write_file(dir, "blocks.txt", BLOCKS),
            nets: write_file(dir, "nets.txt", NETS),
            output: dir.path().join("out.txt").to_str().unwrap().to_string(),
            workers: Some(2),
            rounds: Some(1),
            slice: Some(0.05),
            seed: Some(42),
            format,
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn end_to_end_text_report() {
        let dir = TempDir::new().unwrap();
        let cli = quick_cli(&dir, ReportFormat::Text);
        let code = run(&cli).unwrap();
        assert_eq!(code, 0);

        let out = std::fs::read_to_string(&cli.output).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        // cost, wirelength, area, extents, elapsed + one line per block
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "8");
    }

    #[test]
    fn end_to_end_json_report() {
        let dir = TempDir::new().unwrap();
        let cli = quick_cli(&dir, ReportFormat::Json);
        run(&cli).unwrap();

        let out = std::fs::read_to_string(&cli.output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["cost"], 8.0);
        assert_eq!(value["blocks"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn out_of_range_alpha_rejected() {
        let dir = TempDir::new().unwrap();
        let mut cli = quick_cli(&dir, ReportFormat::Text);
        cli.alpha = 1.5;
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn missing_blocks_file_rejected() {
        let dir = TempDir::new().unwrap();
        let mut cli = quick_cli(&dir, ReportFormat::Text);
        cli.blocks = "/nonexistent/blocks.txt".to_string();
        assert!(run(&cli).is_err());
    }

    #[test]
    fn config_file_supplies_defaults() {
        let dir = TempDir::new().unwrap();
        let mut cli = quick_cli(&dir, ReportFormat::Text);
        cli.workers = None;
        cli.rounds = None;
        cli.slice = None;
        cli.seed = None;
        cli.config = Some(write_file(
            &dir,
            "mondrian.toml",
            "[search]\nworkers = 1\nrounds = 1\nslice_secs = 0.05\nseed = 7\n",
        ));
        let code = run(&cli).unwrap();
        assert_eq!(code, 0);
        assert!(std::fs::read_to_string(&cli.output).unwrap().starts_with('8'));
    }
}
