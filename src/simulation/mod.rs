//! Batch simulation - headless sessions driven by a scripted player bot
//!
//! Runs whole matches without rendering, optionally in parallel, and
//! summarises the outcomes as JSON. Recorded play logs can be summarised
//! the same way.

pub mod config;
pub mod metrics;
pub mod parallel;
pub mod replay;
pub mod runner;

pub use config::{PlayerBot, SIM_SETTINGS_FILE, SimConfig};
pub use metrics::{BatchSummary, MatchResult};
pub use parallel::{MatchConfig, build_match_configs, init_parallel, run_matches_parallel};
pub use replay::{REPLAY_BOT, summarize_log, summarize_log_file};
pub use runner::{bot_commands, run_match, run_simulation, write_summary};
