//! Summaries of recorded play sessions
//!
//! The windowed game logs every bus event as a compact line at debug level.
//! Capturing that output and feeding it back here gives the same
//! `MatchResult` counters a batch match produces.

use std::collections::HashSet;

use crate::constants::{FIXED_TIMESTEP, PLAYER_MAX_HEALTH};
use crate::events::{ActorId, GameEvent, parse_log};

use super::metrics::MatchResult;

/// Bot label for matches played by hand
pub const REPLAY_BOT: &str = "human";

/// Fold a captured event log into one match result
pub fn summarize_log(content: &str) -> MatchResult {
    let events = parse_log(content);
    let mut result = MatchResult {
        bot: REPLAY_BOT.to_string(),
        player_health: PLAYER_MAX_HEALTH,
        ..Default::default()
    };
    let mut dead_enemies = HashSet::new();
    let mut last_ms = 0;

    for (time_ms, event) in &events {
        last_ms = *time_ms;
        match event {
            GameEvent::LevelStart { level, enemies } => {
                result.level_name = level.clone();
                result.enemies_total = *enemies;
            }
            GameEvent::Damage {
                actor: ActorId::Player,
                health,
                ..
            } => result.player_health = *health,
            GameEvent::Death {
                actor: ActorId::Enemy(index),
            } => {
                dead_enemies.insert(*index);
            }
            _ => {}
        }
        result.record(std::slice::from_ref(event));
    }

    result.duration = last_ms as f32 / 1000.0;
    result.ticks = (result.duration / FIXED_TIMESTEP).round() as u32;
    result.enemies_alive = result.enemies_total.saturating_sub(dead_enemies.len());
    if result.player_died {
        result.player_health = 0.0;
    }
    result
}

pub fn summarize_log_file(path: &str) -> Result<MatchResult, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let result = summarize_log(&content);
    if result.level_name.is_empty() {
        return Err(format!("No level start found in {}", path));
    }
    Ok(result)
}
