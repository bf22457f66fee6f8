//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                       # Run every scenario
//!   cargo run --bin test-scenarios -- combat/            # Run one category
//!   cargo run --bin test-scenarios -- combat/light_combo # Run one scenario
//!   cargo run --bin test-scenarios -- --list             # List without running
//!   cargo run --bin test-scenarios -- -v                 # Full failure details

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use nightpaw::constants::LEVELS_FILE;
use nightpaw::levels::LevelDatabase;
use nightpaw::testing::{SCENARIOS_DIR, TestResult, parser::parse_test_file, run_test_with};

#[derive(Debug, Default)]
struct Args {
    verbose: bool,
    list: bool,
    filters: Vec<String>,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            match arg.as_str() {
                "--verbose" | "-v" => parsed.verbose = true,
                "--list" | "-l" => parsed.list = true,
                flag if flag.starts_with('-') => eprintln!("Ignoring unknown flag '{}'", flag),
                _ => parsed.filters.push(arg),
            }
        }
        parsed
    }

    /// No filters selects everything; otherwise any filter may match
    fn selects(&self, scenario: &Scenario) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| scenario.id.contains(f.as_str()))
    }
}

/// One scenario file, addressed by its path under the scenarios directory
struct Scenario {
    /// `category/name`, the string filters match against
    id: String,
    category: String,
    name: String,
    path: PathBuf,
}

impl Scenario {
    fn new(base: &Path, path: PathBuf) -> Self {
        let relative = path.strip_prefix(base).unwrap_or(&path);
        let category = relative
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let name = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        let id = if category.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", category, name)
        };
        Self {
            id,
            category,
            name,
            path,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    failed: usize,
    errors: usize,
    frames: u64,
}

impl Tally {
    fn record(&mut self, result: &TestResult) {
        match result {
            TestResult::Pass { frames } => {
                self.passed += 1;
                self.frames += u64::from(*frames);
            }
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
    }

    fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

fn main() -> ExitCode {
    let args = Args::parse(std::env::args().skip(1));
    let base = Path::new(SCENARIOS_DIR);
    if !base.is_dir() {
        eprintln!("No scenarios directory at {}", SCENARIOS_DIR);
        return ExitCode::FAILURE;
    }

    let mut scenarios = Vec::new();
    collect_scenarios(base, base, &mut scenarios);
    scenarios.retain(|s| args.selects(s));
    scenarios.sort_by(|a, b| a.id.cmp(&b.id));

    if scenarios.is_empty() {
        eprintln!("No scenarios matched {:?}", args.filters);
        return ExitCode::FAILURE;
    }

    if args.list {
        for scenario in &scenarios {
            println!("{}", scenario.id);
        }
        return ExitCode::SUCCESS;
    }

    let level_db = LevelDatabase::load_from_file(LEVELS_FILE);
    let mut tally = Tally::default();
    let mut category: Option<&str> = None;

    println!("Running {} scenarios\n", scenarios.len());
    for scenario in &scenarios {
        if category != Some(scenario.category.as_str()) {
            if category.is_some() {
                println!();
            }
            println!("[{}]", scenario.category);
            category = Some(scenario.category.as_str());
        }

        let result = match parse_test_file(&scenario.path) {
            Ok(def) => run_test_with(&def, &level_db),
            Err(message) => TestResult::Error { message },
        };
        tally.record(&result);
        report(&scenario.name, &result, args.verbose);
    }

    println!(
        "\n{} passed, {} failed, {} errors ({} frames simulated)",
        tally.passed, tally.failed, tally.errors, tally.frames
    );
    if tally.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn collect_scenarios(base: &Path, dir: &Path, out: &mut Vec<Scenario>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect_scenarios(base, &path, out);
        } else if path.extension().is_some_and(|e| e == "toml") {
            out.push(Scenario::new(base, path));
        }
    }
}

fn report(name: &str, result: &TestResult, verbose: bool) {
    let label = format!("{} ", name);
    match result {
        TestResult::Pass { frames } => println!("  {:.<44} ok ({} frames)", label, frames),
        TestResult::Fail { error } => {
            println!("  {:.<44} FAIL", label);
            if verbose {
                println!("      {}", error);
            } else {
                println!("      {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {:.<44} ERROR", label);
            println!("      {}", message);
        }
    }
}
