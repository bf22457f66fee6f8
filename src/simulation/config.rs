//! Simulation configuration

use serde::{Deserialize, Serialize};

/// Scripted policy standing in for the human player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerBot {
    /// Stands still; measures how fast enemies win unopposed
    #[default]
    Idle,
    /// Walks toward the nearest living enemy and heavy-attacks in reach
    Advance,
    /// Dodges whenever a nearby enemy is mid-strike
    Dodger,
}

impl PlayerBot {
    pub fn from_name(name: &str) -> Option<PlayerBot> {
        match name.to_ascii_lowercase().as_str() {
            "idle" => Some(PlayerBot::Idle),
            "advance" => Some(PlayerBot::Advance),
            "dodger" => Some(PlayerBot::Dodger),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerBot::Idle => "idle",
            PlayerBot::Advance => "advance",
            PlayerBot::Dodger => "dodger",
        }
    }
}

/// Configuration for a simulation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Level name or index; None runs every level in the database
    pub level: Option<String>,
    /// Matches per level
    pub runs: u32,
    /// Match duration limit in seconds
    pub duration: f32,
    /// Base RNG seed (None = random)
    pub seed: Option<u64>,
    /// Worker threads (0 = sequential)
    pub threads: usize,
    pub bot: PlayerBot,
    /// Output file path (None = stdout)
    pub output: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
    /// Summarise a captured game log instead of simulating
    pub replay: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            level: None,
            runs: 1,
            duration: 30.0,
            seed: None,
            threads: 0,
            bot: PlayerBot::Idle,
            output: None,
            quiet: false,
            replay: None,
        }
    }
}

/// Simulation settings (checked into git)
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        Self::from_json(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    pub fn from_json(contents: &str) -> Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }

    /// Settings file if present, otherwise built-in defaults
    pub fn from_config_files() -> Self {
        Self::from_file(SIM_SETTINGS_FILE).unwrap_or_default()
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_arg_list(&args)
    }

    /// CLI flags override the settings file, which overrides defaults
    pub fn from_arg_list(args: &[String]) -> Self {
        let mut config = Self::from_config_files();

        // Explicit settings file replaces the base before flags apply
        if let Some(pos) = args.iter().position(|a| a == "--settings") {
            if let Some(path) = args.get(pos + 1) {
                match Self::from_file(path) {
                    Ok(loaded) => config = loaded,
                    Err(e) => eprintln!("Warning: {}", e),
                }
            }
        }

        config.apply_args(args);
        config
    }

    fn apply_args(&mut self, args: &[String]) {
        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => {
                    i += 1;
                }
                "--level" => {
                    if let Some(v) = value {
                        self.level = Some(v.clone());
                        i += 1;
                    }
                }
                "--runs" => {
                    if let Some(v) = value {
                        self.runs = v.parse().unwrap_or(1);
                        i += 1;
                    }
                }
                "--duration" => {
                    if let Some(v) = value {
                        self.duration = v.parse().unwrap_or(30.0);
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(v) = value {
                        self.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--threads" | "--parallel" => {
                    if let Some(v) = value {
                        self.threads = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--bot" => {
                    if let Some(v) = value {
                        match PlayerBot::from_name(v) {
                            Some(bot) => self.bot = bot,
                            None => eprintln!(
                                "Warning: unknown bot '{}', keeping {}",
                                v,
                                self.bot.name()
                            ),
                        }
                        i += 1;
                    }
                }
                "--output" => {
                    if let Some(v) = value {
                        self.output = Some(v.clone());
                        i += 1;
                    }
                }
                "--replay" => {
                    if let Some(v) = value {
                        self.replay = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => {
                    self.quiet = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Warning: ignoring unknown argument '{}'", other);
                }
            }
            i += 1;
        }
    }
}

fn print_help() {
    println!(
        r#"Batch Simulation - headless sessions with a scripted player

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --level <NAME|N>    Level name or index (default: every level)
    --runs <N>          Matches per level (default: 1)
    --duration <SECS>   Match duration limit in seconds (default: 30)
    --seed <N>          Base RNG seed for reproducibility
    --threads <N>       Run matches in parallel on N threads (0 = sequential)
    --bot <NAME>        Player bot: idle, advance, dodger (default: idle)
    --output <FILE>     Write the JSON summary to a file (default: stdout)
    --replay <FILE>     Summarise a captured game log (RUST_LOG=nightpaw=debug) instead
    --quiet, -q         Suppress progress output
    --help, -h          Show this help

EXAMPLES:
    cargo run --bin simulate -- --level Arena --runs 20 --bot advance --threads 4
    cargo run --bin simulate -- --seed 7 --bot dodger --output sim.json
    cargo run --bin simulate -- --replay game.log
"#
    );
}
