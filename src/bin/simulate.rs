//! Batch Simulation Tool - headless sessions with a scripted player
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --level Arena --runs 20 --bot advance
//!   cargo run --bin simulate -- --threads 8 --output sim.json
//!   cargo run --bin simulate -- --replay game.log

use nightpaw::simulation::{
    BatchSummary, SimConfig, run_simulation, summarize_log_file, write_summary,
};

fn main() {
    let config = SimConfig::from_args();
    let result = match &config.replay {
        Some(path) => summarize_log_file(path).map(|m| BatchSummary::from_results(vec![m])),
        None => run_simulation(&config),
    };
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !config.quiet {
        eprintln!(
            "{} matches: {} deaths, {} clears, {} timeouts",
            summary.matches, summary.player_deaths, summary.clears, summary.timeouts
        );
    }
    if let Err(e) = write_summary(&summary, config.output.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
