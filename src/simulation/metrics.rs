//! Metrics collection for batch simulation

use serde::{Deserialize, Serialize};

use crate::events::{ActorId, GameEvent};

/// Result of a single match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResult {
    /// Position in the batch
    pub run: u32,
    pub level_name: String,
    pub bot: String,
    pub seed: u64,
    /// Fixed steps simulated
    pub ticks: u32,
    /// Simulated seconds
    pub duration: f32,
    pub player_health: f32,
    pub player_died: bool,
    pub enemies_total: usize,
    pub enemies_alive: usize,
    /// Damage events that hit the player
    pub player_hits_taken: u32,
    /// Damage events that hit an enemy
    pub enemy_hits_taken: u32,
    pub player_attacks: u32,
    pub enemy_attacks: u32,
    pub jumps: u32,
    pub dodges: u32,
}

impl MatchResult {
    /// Fold one tick's events into the counters
    pub fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Damage { actor, .. } => match actor {
                    ActorId::Player => self.player_hits_taken += 1,
                    ActorId::Enemy(_) => self.enemy_hits_taken += 1,
                },
                GameEvent::AttackCommit { actor, .. } => match actor {
                    ActorId::Player => self.player_attacks += 1,
                    ActorId::Enemy(_) => self.enemy_attacks += 1,
                },
                GameEvent::Death {
                    actor: ActorId::Player,
                } => self.player_died = true,
                GameEvent::Jump { .. } => self.jumps += 1,
                GameEvent::Dodge { .. } => self.dodges += 1,
                _ => {}
            }
        }
    }

    /// Every enemy dead with the player still standing
    pub fn cleared(&self) -> bool {
        !self.player_died && self.enemies_total > 0 && self.enemies_alive == 0
    }

    /// Damage events per simulated second
    pub fn damage_rate(&self) -> f32 {
        if self.duration > 0.0 {
            (self.player_hits_taken + self.enemy_hits_taken) as f32 / self.duration
        } else {
            0.0
        }
    }
}

/// Aggregate over a batch of matches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub matches: usize,
    pub player_deaths: usize,
    pub clears: usize,
    pub timeouts: usize,
    pub avg_ticks: f32,
    pub avg_player_health: f32,
    pub avg_enemies_alive: f32,
    pub total_player_hits: u32,
    pub total_enemy_hits: u32,
    pub total_attacks: u32,
    pub results: Vec<MatchResult>,
}

impl BatchSummary {
    pub fn from_results(results: Vec<MatchResult>) -> Self {
        let matches = results.len();
        let mut summary = Self {
            matches,
            ..Default::default()
        };
        if matches == 0 {
            return summary;
        }

        let mut ticks = 0u64;
        let mut health = 0.0;
        let mut alive = 0usize;
        for result in &results {
            if result.player_died {
                summary.player_deaths += 1;
            } else if result.cleared() {
                summary.clears += 1;
            } else {
                summary.timeouts += 1;
            }
            ticks += result.ticks as u64;
            health += result.player_health;
            alive += result.enemies_alive;
            summary.total_player_hits += result.player_hits_taken;
            summary.total_enemy_hits += result.enemy_hits_taken;
            summary.total_attacks += result.player_attacks + result.enemy_attacks;
        }

        let n = matches as f32;
        summary.avg_ticks = ticks as f32 / n;
        summary.avg_player_health = health / n;
        summary.avg_enemies_alive = alive as f32 / n;
        summary.results = results;
        summary
    }

    /// Fraction of matches the player died in
    pub fn death_rate(&self) -> f32 {
        if self.matches == 0 {
            0.0
        } else {
            self.player_deaths as f32 / self.matches as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackKind;

    #[test]
    fn test_record_counts_by_actor() {
        let mut result = MatchResult::default();
        result.record(&[
            GameEvent::AttackCommit {
                actor: ActorId::Enemy(0),
                kind: AttackKind::Strike,
            },
            GameEvent::Damage {
                actor: ActorId::Player,
                amount: 10.0,
                health: 90.0,
            },
            GameEvent::Dodge {
                actor: ActorId::Player,
            },
        ]);
        assert_eq!(result.enemy_attacks, 1);
        assert_eq!(result.player_hits_taken, 1);
        assert_eq!(result.enemy_hits_taken, 0);
        assert_eq!(result.dodges, 1);
        assert!(!result.player_died);

        result.record(&[GameEvent::Death {
            actor: ActorId::Player,
        }]);
        assert!(result.player_died);
    }

    #[test]
    fn test_summary_buckets_outcomes() {
        let died = MatchResult {
            player_died: true,
            enemies_total: 1,
            enemies_alive: 1,
            ticks: 100,
            ..Default::default()
        };
        let cleared = MatchResult {
            player_health: 80.0,
            enemies_total: 1,
            ticks: 300,
            ..Default::default()
        };
        let timeout = MatchResult {
            player_health: 100.0,
            enemies_total: 2,
            enemies_alive: 2,
            ticks: 200,
            ..Default::default()
        };
        let summary = BatchSummary::from_results(vec![died, cleared, timeout]);
        assert_eq!(summary.matches, 3);
        assert_eq!(summary.player_deaths, 1);
        assert_eq!(summary.clears, 1);
        assert_eq!(summary.timeouts, 1);
        assert_eq!(summary.avg_ticks, 200.0);
        assert_eq!(summary.avg_player_health, 60.0);
        assert_eq!(summary.avg_enemies_alive, 1.0);
        assert!((summary.death_rate() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchSummary::from_results(Vec::new());
        assert_eq!(summary.matches, 0);
        assert_eq!(summary.death_rate(), 0.0);
    }
}
