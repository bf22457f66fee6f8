//! Sprite-sheet clips and key-frame sampling

use bevy::prelude::*;

/// Every clip the game knows how to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipId {
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerFall,
    PlayerAttack,
    PlayerLight1,
    PlayerLight2,
    PlayerAirAttack,
    PlayerDodge,
    PlayerHurt,
    PlayerDeath,
    EnemyIdle,
    EnemyWalk,
    EnemyAttack,
    EnemyHurt,
    EnemyDeath,
}

impl ClipId {
    pub const ALL: [ClipId; 16] = [
        ClipId::PlayerIdle,
        ClipId::PlayerRun,
        ClipId::PlayerJump,
        ClipId::PlayerFall,
        ClipId::PlayerAttack,
        ClipId::PlayerLight1,
        ClipId::PlayerLight2,
        ClipId::PlayerAirAttack,
        ClipId::PlayerDodge,
        ClipId::PlayerHurt,
        ClipId::PlayerDeath,
        ClipId::EnemyIdle,
        ClipId::EnemyWalk,
        ClipId::EnemyAttack,
        ClipId::EnemyHurt,
        ClipId::EnemyDeath,
    ];

    /// Manifest name
    pub fn name(self) -> &'static str {
        match self {
            ClipId::PlayerIdle => "player_idle",
            ClipId::PlayerRun => "player_run",
            ClipId::PlayerJump => "player_jump",
            ClipId::PlayerFall => "player_fall",
            ClipId::PlayerAttack => "player_attack",
            ClipId::PlayerLight1 => "player_light_1",
            ClipId::PlayerLight2 => "player_light_2",
            ClipId::PlayerAirAttack => "player_air_attack",
            ClipId::PlayerDodge => "player_dodge",
            ClipId::PlayerHurt => "player_hurt",
            ClipId::PlayerDeath => "player_death",
            ClipId::EnemyIdle => "enemy_idle",
            ClipId::EnemyWalk => "enemy_walk",
            ClipId::EnemyAttack => "enemy_attack",
            ClipId::EnemyHurt => "enemy_hurt",
            ClipId::EnemyDeath => "enemy_death",
        }
    }

    pub fn from_name(name: &str) -> Option<ClipId> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// A run of equal-duration frames on one sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClip {
    /// Index into the library's sheet list
    pub sheet: usize,
    pub first_frame: usize,
    pub frame_count: usize,
    pub frame_duration: f32,
}

impl AnimationClip {
    /// Frame within the clip: wraps when looping, else holds the last frame
    pub fn key_frame(&self, elapsed: f32, looping: bool) -> usize {
        if self.frame_count <= 1 || self.frame_duration <= 0.0 {
            return 0;
        }
        let frame = (elapsed.max(0.0) / self.frame_duration) as usize;
        if looping {
            frame % self.frame_count
        } else {
            frame.min(self.frame_count - 1)
        }
    }

    /// Frame index on the sheet
    pub fn sheet_index(&self, elapsed: f32, looping: bool) -> usize {
        self.first_frame + self.key_frame(elapsed, looping)
    }

    pub fn duration(&self) -> f32 {
        self.frame_duration * self.frame_count as f32
    }
}

/// What the renderer should draw for one actor this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub clip: ClipId,
    pub sheet: usize,
    /// Frame index on the sheet
    pub index: usize,
    pub flip_x: bool,
    /// Drawn size in world units
    pub size: Vec2,
    /// Sprite center in world units
    pub position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(count: usize) -> AnimationClip {
        AnimationClip {
            sheet: 0,
            first_frame: 6,
            frame_count: count,
            frame_duration: 0.125,
        }
    }

    #[test]
    fn test_looping_wraps() {
        let clip = clip(4);
        assert_eq!(clip.key_frame(0.0, true), 0);
        assert_eq!(clip.key_frame(0.26, true), 2);
        assert_eq!(clip.key_frame(0.5, true), 0);
        assert_eq!(clip.key_frame(0.65, true), 1);
    }

    #[test]
    fn test_non_looping_clamps() {
        let clip = clip(4);
        assert_eq!(clip.key_frame(0.4, false), 3);
        assert_eq!(clip.key_frame(10.0, false), 3);
        assert_eq!(clip.sheet_index(10.0, false), 9);
    }

    #[test]
    fn test_single_frame_clip() {
        assert_eq!(clip(1).key_frame(3.0, true), 0);
    }

    #[test]
    fn test_clip_names_parse_back() {
        for id in ClipId::ALL {
            assert_eq!(ClipId::from_name(id.name()), Some(id));
        }
        assert_eq!(ClipId::from_name("player_moonwalk"), None);
    }
}
