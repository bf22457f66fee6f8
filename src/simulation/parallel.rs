//! Parallel simulation execution
//!
//! Uses Rayon to run whole matches concurrently. Every match owns its
//! session and physics world; nothing is shared across threads.

use rayon::prelude::*;

use crate::levels::{LevelData, LevelDatabase};
use crate::tuning::CombatTuning;

use super::config::SimConfig;
use super::metrics::MatchResult;
use super::runner::run_match;

/// Configuration for a single match in a batch
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Position in the batch
    pub run: u32,
    pub level: LevelData,
    /// RNG seed for this match
    pub seed: u64,
}

/// Initialize the global Rayon pool with the given thread count.
/// Call once at startup; 0 keeps Rayon's default.
pub fn init_parallel(threads: usize) -> Result<(), String> {
    if threads == 0 {
        return Ok(());
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| format!("Failed to initialize Rayon thread pool: {}", e))
}

/// One entry per (level, run). Each match seed is derived from the base seed.
pub fn build_match_configs(
    config: &SimConfig,
    level_db: &LevelDatabase,
    base_seed: u64,
) -> Result<Vec<MatchConfig>, String> {
    let levels: Vec<LevelData> = match &config.level {
        Some(key) => {
            let level = level_db.find(key).ok_or_else(|| {
                format!(
                    "Level '{}' not found. Available: {:?}",
                    key,
                    level_db.levels.iter().map(|l| &l.name).collect::<Vec<_>>()
                )
            })?;
            vec![level.clone()]
        }
        None => level_db.levels.clone(),
    };

    let mut configs = Vec::new();
    let mut run = 0u32;
    for level in &levels {
        for _ in 0..config.runs {
            configs.push(MatchConfig {
                run,
                level: level.clone(),
                seed: base_seed.wrapping_add(run as u64),
            });
            run += 1;
        }
    }
    Ok(configs)
}

/// Run matches in parallel. Returns results in the same order as `matches`.
pub fn run_matches_parallel(
    matches: &[MatchConfig],
    config: &SimConfig,
    tuning: &CombatTuning,
) -> Vec<MatchResult> {
    matches
        .par_iter()
        .map(|m| run_match(config, &m.level, tuning, m.run, m.seed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::PlayerBot;

    fn config(level: Option<&str>, runs: u32) -> SimConfig {
        SimConfig {
            level: level.map(str::to_string),
            runs,
            duration: 2.0,
            bot: PlayerBot::Advance,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_configs_cover_every_level() {
        let db = LevelDatabase::default_levels();
        let configs = build_match_configs(&config(None, 2), &db, 100).unwrap();
        assert_eq!(configs.len(), db.len() * 2);
        assert_eq!(configs[0].seed, 100);
        assert_eq!(configs[3].seed, 103);
        assert_eq!(configs[2].level.name, db.levels[1].name);
    }

    #[test]
    fn test_unknown_level_is_error() {
        let db = LevelDatabase::default_levels();
        assert!(build_match_configs(&config(Some("Moon"), 1), &db, 0).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let db = LevelDatabase::default_levels();
        let cfg = config(Some("Arena"), 4);
        let tuning = CombatTuning::default();
        let matches = build_match_configs(&cfg, &db, 11).unwrap();

        let parallel = run_matches_parallel(&matches, &cfg, &tuning);
        let sequential: Vec<MatchResult> = matches
            .iter()
            .map(|m| run_match(&cfg, &m.level, &tuning, m.run, m.seed))
            .collect();

        assert_eq!(parallel.len(), 4);
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.run, s.run);
            assert_eq!(p.seed, s.seed);
            assert_eq!(p.ticks, s.ticks);
            assert_eq!(p.player_health, s.player_health);
        }
    }
}
