//! Capability tables - what a combat actor is able to do
//!
//! The player and enemies differ only in these tables:
//! - Player: heavy, light combo, air attack, dodge, invincibility frames
//! - Enemy: a single melee strike; hurt interrupts it

use bevy::prelude::Vec2;

use super::AttackKind;
use crate::constants::*;
use crate::tuning::CombatTuning;

/// Timing and reach of one attack variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackSpec {
    pub duration: f32,
    pub range: f32,
    pub damage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodgeSpec {
    pub duration: f32,
    pub cooldown: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub max_health: f32,
    pub hurt_duration: f32,
    /// Zero disables invincibility frames
    pub invincibility_duration: f32,
    pub heavy: Option<AttackSpec>,
    pub light: Option<AttackSpec>,
    pub air: Option<AttackSpec>,
    pub strike: Option<AttackSpec>,
    pub combo_window: Option<f32>,
    pub dodge: Option<DodgeSpec>,
    pub motion_threshold: f32,
    /// Derive Idle/Moving/Jumping/Falling from velocity each tick
    pub infer_motion: bool,
    pub hurt_interrupts_attack: bool,
    pub half_extents: Vec2,
}

impl Capabilities {
    pub fn player(tuning: &CombatTuning) -> Self {
        Self {
            move_speed: tuning.player_move_speed,
            jump_impulse: tuning.player_jump_force,
            max_health: tuning.player_max_health,
            hurt_duration: tuning.hurt_duration,
            invincibility_duration: tuning.invincibility_duration,
            heavy: Some(AttackSpec {
                duration: tuning.heavy_attack_duration,
                range: tuning.heavy_attack_range,
                damage: tuning.heavy_attack_damage,
            }),
            light: Some(AttackSpec {
                duration: tuning.light_attack_duration,
                range: tuning.light_attack_range,
                damage: tuning.light_attack_damage,
            }),
            air: Some(AttackSpec {
                duration: tuning.air_attack_duration,
                range: tuning.air_attack_range,
                damage: tuning.air_attack_damage,
            }),
            strike: None,
            combo_window: Some(tuning.combo_window),
            dodge: Some(DodgeSpec {
                duration: tuning.dodge_duration,
                cooldown: tuning.dodge_cooldown,
                speed: tuning.dodge_speed,
            }),
            motion_threshold: tuning.motion_threshold,
            infer_motion: true,
            hurt_interrupts_attack: false,
            half_extents: Vec2::splat(PLAYER_HALF_SIZE),
        }
    }

    pub fn enemy(tuning: &CombatTuning) -> Self {
        Self {
            move_speed: tuning.enemy_move_speed,
            jump_impulse: tuning.enemy_jump_impulse,
            max_health: tuning.enemy_max_health,
            hurt_duration: tuning.enemy_hurt_duration,
            invincibility_duration: 0.0,
            heavy: None,
            light: None,
            air: None,
            strike: Some(AttackSpec {
                duration: tuning.enemy_attack_duration,
                range: tuning.enemy_attack_range,
                damage: tuning.enemy_attack_damage,
            }),
            combo_window: None,
            dodge: None,
            motion_threshold: tuning.motion_threshold,
            infer_motion: false,
            hurt_interrupts_attack: true,
            half_extents: Vec2::splat(ENEMY_HALF_SIZE),
        }
    }

    pub fn attack(&self, kind: AttackKind) -> Option<&AttackSpec> {
        match kind {
            AttackKind::Heavy => self.heavy.as_ref(),
            AttackKind::Light(_) => self.light.as_ref(),
            AttackKind::Air => self.air.as_ref(),
            AttackKind::Strike => self.strike.as_ref(),
        }
    }
}
