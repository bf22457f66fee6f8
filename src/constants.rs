//! Tunable constants for nightpaw
//!
//! All gameplay values are defined here for easy tweaking.
//! World units are meters; the viewport is 8 x 4.8 of them.

use bevy::prelude::*;

// =============================================================================
// FILES
// =============================================================================

pub const LEVELS_FILE: &str = "config/levels.txt";
pub const ANIMATIONS_FILE: &str = "assets/animations.txt";

// =============================================================================
// VIEWPORT / COLORS
// =============================================================================

pub const VIEWPORT_WIDTH: f32 = 8.0;
pub const VIEWPORT_HEIGHT: f32 = 4.8;
pub const PIXELS_PER_UNIT: f32 = 100.0;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.1, 0.1, 0.1);
pub const PLATFORM_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);
pub const HEALTH_BAR_BACK_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const HEALTH_BAR_FILL_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);

// HUD health bar placement, in world units from the bottom-left corner
pub const HEALTH_BAR_POSITION: Vec2 = Vec2::new(0.4, 4.3);
pub const HEALTH_BAR_SIZE: Vec2 = Vec2::new(1.0, 0.4);

// =============================================================================
// PHYSICS
// =============================================================================

pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
pub const DEFAULT_GRAVITY: f32 = -1.0;
pub const BODY_DENSITY: f32 = 1.0;
pub const COLLISION_EPSILON: f32 = 0.005; // Skin depth so resting contacts persist between steps

// =============================================================================
// PLAYER
// =============================================================================

pub const PLAYER_HALF_SIZE: f32 = 0.25;
pub const PLAYER_SPEED: f32 = 1.0;
pub const JUMP_FORCE: f32 = 0.5; // Linear impulse, not velocity
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const MOTION_THRESHOLD: f32 = 0.1; // Below this a velocity axis counts as still
pub const STICK_DEADZONE: f32 = 0.25;

pub const HURT_DURATION: f32 = 0.5;
pub const INVINCIBILITY_DURATION: f32 = 1.0;

pub const HEAVY_ATTACK_DURATION: f32 = 0.25;
pub const HEAVY_ATTACK_RANGE: f32 = 1.0;
pub const HEAVY_ATTACK_DAMAGE: f32 = 25.0;

pub const AIR_ATTACK_DURATION: f32 = 0.25;
pub const AIR_ATTACK_RANGE: f32 = 1.0;
pub const AIR_ATTACK_DAMAGE: f32 = 20.0;

pub const LIGHT_ATTACK_DURATION: f32 = 0.3;
pub const LIGHT_ATTACK_RANGE: f32 = 0.8;
pub const LIGHT_ATTACK_DAMAGE: f32 = 15.0;
pub const COMBO_WINDOW: f32 = 0.5;

pub const DODGE_DURATION: f32 = 0.6;
pub const DODGE_COOLDOWN: f32 = 1.2;
pub const DODGE_SPEED: f32 = 3.0;

pub const DEBUG_SELF_DAMAGE: f32 = 10.0;

// =============================================================================
// ENEMY
// =============================================================================

pub const ENEMY_HALF_SIZE: f32 = 0.25;
pub const ENEMY_SPEED: f32 = 0.4;
pub const ENEMY_JUMP_IMPULSE: f32 = 5.0;
pub const ENEMY_MAX_HEALTH: f32 = 50.0;
pub const ENEMY_HURT_DURATION: f32 = 0.5;
pub const ENEMY_ATTACK_DURATION: f32 = 0.6;
pub const ENEMY_ATTACK_RANGE: f32 = 1.0;
pub const ENEMY_ATTACK_DAMAGE: f32 = 10.0;

// =============================================================================
// SPRITES
// =============================================================================

pub const PLAYER_SPRITE_WIDTH: f32 = 64.0;
pub const PLAYER_SPRITE_HEIGHT: f32 = 32.0;
pub const ATTACK_SCALE: f32 = 0.02;
pub const REGULAR_SCALE_X: f32 = 0.01;
pub const REGULAR_SCALE_Y: f32 = 0.015;

pub const IDLE_OFFSET: f32 = 0.01;
pub const RUN_OFFSET: f32 = 0.075;
pub const ATTACK_OFFSET: f32 = 0.02;
pub const JUMP_OFFSET: f32 = 0.02;
