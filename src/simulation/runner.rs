//! Headless simulation runner
//!
//! A match is one `GameSession` stepped at the tuning timestep with a
//! `PlayerBot` producing the commands. No Bevy app is involved.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::Write;

use crate::combat::CombatState;
use crate::constants::*;
use crate::events::ActorId;
use crate::input::PlayerCommands;
use crate::levels::{LevelData, LevelDatabase};
use crate::session::GameSession;
use crate::tuning::CombatTuning;

use super::config::{PlayerBot, SimConfig};
use super::metrics::{BatchSummary, MatchResult};
use super::parallel::{MatchConfig, build_match_configs, init_parallel, run_matches_parallel};

/// Horizontal spawn jitter applied to the player, in world units
const SPAWN_JITTER: f32 = 0.25;

/// Enemy distance at which the dodger reacts to a strike
const DODGE_TRIGGER_DISTANCE: f32 = 1.5;

/// Run a single match and return the result
pub fn run_match(
    config: &SimConfig,
    level: &LevelData,
    tuning: &CombatTuning,
    run: u32,
    seed: u64,
) -> MatchResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = level.clone();
    level.player_spawn.x += rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER);

    let mut session = GameSession::from_level(&level, tuning);
    session.bus_mut().drain();

    let dt = tuning.fixed_timestep;
    let max_ticks = (config.duration / dt).round().max(1.0) as u32;
    let mut result = MatchResult {
        run,
        level_name: level.name.clone(),
        bot: config.bot.name().to_string(),
        seed,
        enemies_total: session.enemies().len(),
        ..Default::default()
    };

    for _ in 0..max_ticks {
        let commands = bot_commands(config.bot, &session, tuning);
        let events = session.tick(dt, &commands);
        session.bus_mut().drain();
        result.record(&events);
        result.ticks += 1;

        if result.player_died || (result.enemies_total > 0 && session.enemies_alive() == 0) {
            break;
        }
    }

    result.duration = result.ticks as f32 * dt;
    result.player_health = session.player().machine().health();
    result.enemies_alive = session.enemies_alive();
    session.dispose();
    result
}

/// Commands the bot issues this tick, read from the session state
pub fn bot_commands(
    bot: PlayerBot,
    session: &GameSession,
    tuning: &CombatTuning,
) -> PlayerCommands {
    let mut commands = PlayerCommands::default();
    let Some(player_pos) = session.position(ActorId::Player) else {
        return commands;
    };

    // Nearest living enemy: (signed dx, distance, state)
    let nearest = session
        .enemies()
        .iter()
        .filter(|e| !e.machine().is_dead())
        .filter_map(|e| {
            let pos = session.position(ActorId::Enemy(e.index()))?;
            Some((pos.x - player_pos.x, pos.distance(player_pos), e.machine().state()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((dx, distance, enemy_state)) = nearest else {
        return commands;
    };

    match bot {
        PlayerBot::Idle => {}
        PlayerBot::Advance => {
            // The heavy strike box spans [0.5, 1.5] ranges ahead of the body.
            // Backing off turns away, so keep going until a full range clear.
            let range = tuning.heavy_attack_range;
            let facing_enemy = session.player().machine().facing().sign() == dx.signum();
            let gap = dx.abs();
            if gap > range * 1.5 {
                commands.move_x = dx.signum();
            } else if facing_enemy && gap < range * 0.5 {
                commands.move_x = -dx.signum();
            } else if !facing_enemy && gap < range {
                commands.move_x = -dx.signum();
            } else if !facing_enemy {
                commands.move_x = dx.signum();
            } else {
                commands.heavy_attack = true;
            }
        }
        PlayerBot::Dodger => {
            let striking = matches!(enemy_state, CombatState::Attacking(_));
            if striking && distance <= DODGE_TRIGGER_DISTANCE {
                commands.dodge = true;
            }
        }
    }
    commands
}

/// Run the configured batch and summarise it
pub fn run_simulation(config: &SimConfig) -> Result<BatchSummary, String> {
    let level_db = LevelDatabase::load_from_file(LEVELS_FILE);
    let tuning = CombatTuning::load();
    let base_seed = config.seed.unwrap_or_else(rand::random);

    let matches = build_match_configs(config, &level_db, base_seed)?;
    if !config.quiet {
        eprintln!(
            "Running {} matches (bot: {}, seed: {})",
            matches.len(),
            config.bot.name(),
            base_seed
        );
    }

    let results = if config.threads > 0 {
        init_parallel(config.threads)?;
        run_matches_parallel(&matches, config, &tuning)
    } else {
        run_sequential(&matches, config, &tuning)
    };

    Ok(BatchSummary::from_results(results))
}

fn run_sequential(
    matches: &[MatchConfig],
    config: &SimConfig,
    tuning: &CombatTuning,
) -> Vec<MatchResult> {
    matches
        .iter()
        .map(|m| {
            let result = run_match(config, &m.level, tuning, m.run, m.seed);
            if !config.quiet {
                eprintln!(
                    "  #{} {}: {} ticks, player {:.0} hp, {} enemies left",
                    result.run,
                    result.level_name,
                    result.ticks,
                    result.player_health,
                    result.enemies_alive
                );
            }
            result
        })
        .collect()
}

/// Write the summary as pretty JSON to `output`, or stdout when None
pub fn write_summary(summary: &BatchSummary, output: Option<&str>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    match output {
        Some(path) => {
            let mut file =
                File::create(path).map_err(|e| format!("Failed to create {}: {}", path, e))?;
            writeln!(file, "{}", json).map_err(|e| format!("Failed to write {}: {}", path, e))
        }
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bot: PlayerBot, duration: f32) -> SimConfig {
        SimConfig {
            bot,
            duration,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_bot_loses_duel() {
        let tuning = CombatTuning::default();
        let result = run_match(
            &config(PlayerBot::Idle, 60.0),
            &LevelData::duel(),
            &tuning,
            0,
            1,
        );
        assert!(result.player_died);
        assert_eq!(result.player_health, 0.0);
        assert!(result.enemy_attacks >= 10);
        assert_eq!(result.player_attacks, 0);
        assert!(result.ticks < 3600);
    }

    #[test]
    fn test_advance_bot_clears_duel() {
        let tuning = CombatTuning::default();
        let result = run_match(
            &config(PlayerBot::Advance, 10.0),
            &LevelData::duel(),
            &tuning,
            0,
            7,
        );
        assert!(result.cleared(), "{:?}", result);
        assert!(result.player_attacks >= 2);
    }

    #[test]
    fn test_same_seed_same_result() {
        let tuning = CombatTuning::default();
        let cfg = config(PlayerBot::Advance, 5.0);
        let a = run_match(&cfg, &LevelData::arena(), &tuning, 0, 42);
        let b = run_match(&cfg, &LevelData::arena(), &tuning, 0, 42);
        assert_eq!(a.ticks, b.ticks);
        assert_eq!(a.player_health, b.player_health);
        assert_eq!(a.enemies_alive, b.enemies_alive);
    }

    #[test]
    fn test_timeout_without_enemies() {
        let tuning = CombatTuning::default();
        let result = run_match(
            &config(PlayerBot::Dodger, 1.0),
            &LevelData::training(),
            &tuning,
            0,
            3,
        );
        assert_eq!(result.ticks, 60);
        assert_eq!(result.enemies_total, 0);
        assert!(!result.cleared());
        assert!(!result.player_died);
    }
}
