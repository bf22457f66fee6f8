//! Combat tuning loaded from JSON (every field falls back to the compiled constant)

use bevy::log::{info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Path to the combat tuning config
pub const COMBAT_TUNING_FILE: &str = "config/combat_tuning.json";

fn default_fixed_timestep() -> f32 {
    FIXED_TIMESTEP
}
fn default_gravity() -> f32 {
    DEFAULT_GRAVITY
}
fn default_motion_threshold() -> f32 {
    MOTION_THRESHOLD
}
fn default_player_move_speed() -> f32 {
    PLAYER_SPEED
}
fn default_player_jump_force() -> f32 {
    JUMP_FORCE
}
fn default_player_max_health() -> f32 {
    PLAYER_MAX_HEALTH
}
fn default_hurt_duration() -> f32 {
    HURT_DURATION
}
fn default_invincibility_duration() -> f32 {
    INVINCIBILITY_DURATION
}
fn default_heavy_attack_duration() -> f32 {
    HEAVY_ATTACK_DURATION
}
fn default_heavy_attack_range() -> f32 {
    HEAVY_ATTACK_RANGE
}
fn default_heavy_attack_damage() -> f32 {
    HEAVY_ATTACK_DAMAGE
}
fn default_light_attack_duration() -> f32 {
    LIGHT_ATTACK_DURATION
}
fn default_light_attack_range() -> f32 {
    LIGHT_ATTACK_RANGE
}
fn default_light_attack_damage() -> f32 {
    LIGHT_ATTACK_DAMAGE
}
fn default_air_attack_duration() -> f32 {
    AIR_ATTACK_DURATION
}
fn default_air_attack_range() -> f32 {
    AIR_ATTACK_RANGE
}
fn default_air_attack_damage() -> f32 {
    AIR_ATTACK_DAMAGE
}
fn default_combo_window() -> f32 {
    COMBO_WINDOW
}
fn default_dodge_duration() -> f32 {
    DODGE_DURATION
}
fn default_dodge_cooldown() -> f32 {
    DODGE_COOLDOWN
}
fn default_dodge_speed() -> f32 {
    DODGE_SPEED
}
fn default_enemy_move_speed() -> f32 {
    ENEMY_SPEED
}
fn default_enemy_jump_impulse() -> f32 {
    ENEMY_JUMP_IMPULSE
}
fn default_enemy_max_health() -> f32 {
    ENEMY_MAX_HEALTH
}
fn default_enemy_hurt_duration() -> f32 {
    ENEMY_HURT_DURATION
}
fn default_enemy_attack_duration() -> f32 {
    ENEMY_ATTACK_DURATION
}
fn default_enemy_attack_range() -> f32 {
    ENEMY_ATTACK_RANGE
}
fn default_enemy_attack_damage() -> f32 {
    ENEMY_ATTACK_DAMAGE
}

/// Serializable combat values stored in config
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatTuning {
    #[serde(default = "default_fixed_timestep")]
    pub fixed_timestep: f32,
    /// Used when a level does not set its own gravity
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_motion_threshold")]
    pub motion_threshold: f32,

    // Player
    #[serde(default = "default_player_move_speed")]
    pub player_move_speed: f32,
    #[serde(default = "default_player_jump_force")]
    pub player_jump_force: f32,
    #[serde(default = "default_player_max_health")]
    pub player_max_health: f32,
    #[serde(default = "default_hurt_duration")]
    pub hurt_duration: f32,
    #[serde(default = "default_invincibility_duration")]
    pub invincibility_duration: f32,
    #[serde(default = "default_heavy_attack_duration")]
    pub heavy_attack_duration: f32,
    #[serde(default = "default_heavy_attack_range")]
    pub heavy_attack_range: f32,
    #[serde(default = "default_heavy_attack_damage")]
    pub heavy_attack_damage: f32,
    #[serde(default = "default_light_attack_duration")]
    pub light_attack_duration: f32,
    #[serde(default = "default_light_attack_range")]
    pub light_attack_range: f32,
    #[serde(default = "default_light_attack_damage")]
    pub light_attack_damage: f32,
    #[serde(default = "default_air_attack_duration")]
    pub air_attack_duration: f32,
    #[serde(default = "default_air_attack_range")]
    pub air_attack_range: f32,
    #[serde(default = "default_air_attack_damage")]
    pub air_attack_damage: f32,
    #[serde(default = "default_combo_window")]
    pub combo_window: f32,
    #[serde(default = "default_dodge_duration")]
    pub dodge_duration: f32,
    #[serde(default = "default_dodge_cooldown")]
    pub dodge_cooldown: f32,
    #[serde(default = "default_dodge_speed")]
    pub dodge_speed: f32,

    // Enemy
    #[serde(default = "default_enemy_move_speed")]
    pub enemy_move_speed: f32,
    #[serde(default = "default_enemy_jump_impulse")]
    pub enemy_jump_impulse: f32,
    #[serde(default = "default_enemy_max_health")]
    pub enemy_max_health: f32,
    #[serde(default = "default_enemy_hurt_duration")]
    pub enemy_hurt_duration: f32,
    #[serde(default = "default_enemy_attack_duration")]
    pub enemy_attack_duration: f32,
    #[serde(default = "default_enemy_attack_range")]
    pub enemy_attack_range: f32,
    #[serde(default = "default_enemy_attack_damage")]
    pub enemy_attack_damage: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            fixed_timestep: default_fixed_timestep(),
            gravity: default_gravity(),
            motion_threshold: default_motion_threshold(),
            player_move_speed: default_player_move_speed(),
            player_jump_force: default_player_jump_force(),
            player_max_health: default_player_max_health(),
            hurt_duration: default_hurt_duration(),
            invincibility_duration: default_invincibility_duration(),
            heavy_attack_duration: default_heavy_attack_duration(),
            heavy_attack_range: default_heavy_attack_range(),
            heavy_attack_damage: default_heavy_attack_damage(),
            light_attack_duration: default_light_attack_duration(),
            light_attack_range: default_light_attack_range(),
            light_attack_damage: default_light_attack_damage(),
            air_attack_duration: default_air_attack_duration(),
            air_attack_range: default_air_attack_range(),
            air_attack_damage: default_air_attack_damage(),
            combo_window: default_combo_window(),
            dodge_duration: default_dodge_duration(),
            dodge_cooldown: default_dodge_cooldown(),
            dodge_speed: default_dodge_speed(),
            enemy_move_speed: default_enemy_move_speed(),
            enemy_jump_impulse: default_enemy_jump_impulse(),
            enemy_max_health: default_enemy_max_health(),
            enemy_hurt_duration: default_enemy_hurt_duration(),
            enemy_attack_duration: default_enemy_attack_duration(),
            enemy_attack_range: default_enemy_attack_range(),
            enemy_attack_damage: default_enemy_attack_damage(),
        }
    }
}

impl CombatTuning {
    pub fn from_json(contents: &str) -> Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse tuning: {}", e))
    }

    /// Load tuning from the default path, falling back to constants
    pub fn load() -> Self {
        Self::load_from_file(COMBAT_TUNING_FILE)
    }

    pub fn load_from_file(path: &str) -> Self {
        match load_combat_tuning_from_file(path) {
            Ok(tuning) => {
                info!("Loaded combat tuning from {}", path);
                tuning
            }
            Err(TuningLoadError::Missing(err)) => {
                info!("{}; using default tuning", err);
                Self::default()
            }
            Err(TuningLoadError::Invalid(err)) => {
                warn!("{}; using default tuning", err);
                Self::default()
            }
        }
    }
}

enum TuningLoadError {
    Missing(String),
    Invalid(String),
}

fn load_combat_tuning_from_file(path: &str) -> Result<CombatTuning, TuningLoadError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| TuningLoadError::Missing(format!("Failed to read {}: {}", path, e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| TuningLoadError::Invalid(format!("Failed to parse {}: {}", path, e)))
}
