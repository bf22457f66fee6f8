//! Player state to sprite clip mapping

use bevy::prelude::*;

use super::Player;
use crate::animation::{AnimationLibrary, ClipId, SpriteFrame};
use crate::combat::{AttackKind, ComboPhase, CombatMachine, CombatState, Facing};
use crate::constants::*;

/// Clip, sampling clock and looping flag for the machine's current state
pub fn player_clip(machine: &CombatMachine) -> (ClipId, f32, bool) {
    let clock = machine.state_time();
    match machine.state() {
        CombatState::Idle => (ClipId::PlayerIdle, clock, true),
        CombatState::Moving => (ClipId::PlayerRun, clock, true),
        CombatState::Jumping => (ClipId::PlayerJump, clock, false),
        CombatState::Falling => (ClipId::PlayerFall, clock, true),
        CombatState::Attacking(AttackKind::Light(ComboPhase::First)) => {
            (ClipId::PlayerLight1, machine.light_elapsed(), false)
        }
        CombatState::Attacking(AttackKind::Light(ComboPhase::Second)) => {
            (ClipId::PlayerLight2, machine.light_elapsed(), false)
        }
        CombatState::Attacking(AttackKind::Air) => {
            (ClipId::PlayerAirAttack, machine.attack_elapsed(), false)
        }
        CombatState::Attacking(_) => (ClipId::PlayerAttack, machine.attack_elapsed(), false),
        CombatState::Dodging => (ClipId::PlayerDodge, machine.dodge_elapsed(), false),
        CombatState::Hurt => (ClipId::PlayerHurt, clock, false),
        CombatState::Dead => (ClipId::PlayerDeath, clock, false),
    }
}

/// Sprite scale and how far the art hangs below the body
fn clip_layout(clip: ClipId) -> (Vec2, f32) {
    let attack = Vec2::splat(ATTACK_SCALE);
    let regular = Vec2::new(REGULAR_SCALE_X, REGULAR_SCALE_Y);
    match clip {
        ClipId::PlayerLight1
        | ClipId::PlayerLight2
        | ClipId::PlayerAttack
        | ClipId::PlayerAirAttack => (attack, ATTACK_OFFSET),
        ClipId::PlayerRun => (regular, RUN_OFFSET),
        ClipId::PlayerJump | ClipId::PlayerFall => (regular, JUMP_OFFSET),
        _ => (regular, IDLE_OFFSET),
    }
}

impl Player {
    /// Frame to draw at `position` (the body center). None if the clip is missing.
    pub fn render(&self, library: &AnimationLibrary, position: Vec2) -> Option<SpriteFrame> {
        let (id, clock, looping) = player_clip(self.machine());
        let clip = library.clip(id)?;
        let (scale, offset) = clip_layout(id);
        let size = Vec2::new(PLAYER_SPRITE_WIDTH, PLAYER_SPRITE_HEIGHT) * scale;
        let half = self.machine().capabilities().half_extents;
        let feet = position.y - half.y - offset;

        Some(SpriteFrame {
            clip: id,
            sheet: clip.sheet,
            index: clip.sheet_index(clock, looping),
            flip_x: self.machine().facing() == Facing::Left,
            size,
            position: Vec2::new(position.x, feet + size.y * 0.5),
        })
    }
}
