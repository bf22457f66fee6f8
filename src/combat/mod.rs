//! Combat module - timed state machine shared by the player and enemies
//!
//! Both actors run the same `CombatMachine`; what differs is the
//! `Capabilities` table it is built from and the policy that feeds it
//! actions (keyboard for the player, pursuit AI for enemies).

mod capabilities;
mod machine;
mod resolver;
mod timer;

pub use capabilities::{AttackSpec, Capabilities, DodgeSpec};
pub use machine::{CombatAction, CombatEvent, CombatMachine, Motion};
pub use resolver::{AttackCommit, resolve_strike, strike_box};
pub use timer::CombatTimer;

use serde::{Deserialize, Serialize};

/// Which way an actor is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing for a horizontal direction; `None` when there is no direction
    pub fn from_direction(dx: f32) -> Option<Facing> {
        if dx > 0.0 {
            Some(Facing::Right)
        } else if dx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Position inside the two-hit light combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboPhase {
    First,
    Second,
}

/// Attack variants. `Strike` is the enemy melee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Heavy,
    Light(ComboPhase),
    Air,
    Strike,
}

impl AttackKind {
    pub fn name(self) -> &'static str {
        match self {
            AttackKind::Heavy => "Heavy",
            AttackKind::Light(ComboPhase::First) => "Light1",
            AttackKind::Light(ComboPhase::Second) => "Light2",
            AttackKind::Air => "Air",
            AttackKind::Strike => "Strike",
        }
    }

    pub fn from_name(name: &str) -> Option<AttackKind> {
        match name {
            "Heavy" => Some(AttackKind::Heavy),
            "Light1" => Some(AttackKind::Light(ComboPhase::First)),
            "Light2" => Some(AttackKind::Light(ComboPhase::Second)),
            "Air" => Some(AttackKind::Air),
            "Strike" => Some(AttackKind::Strike),
            _ => None,
        }
    }
}

/// The single active state of a combat actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Idle,
    Moving,
    Jumping,
    Falling,
    Attacking(AttackKind),
    Dodging,
    Hurt,
    Dead,
}

impl CombatState {
    /// Category name, without the attack variant
    pub fn name(self) -> &'static str {
        match self {
            CombatState::Idle => "Idle",
            CombatState::Moving => "Moving",
            CombatState::Jumping => "Jumping",
            CombatState::Falling => "Falling",
            CombatState::Attacking(_) => "Attacking",
            CombatState::Dodging => "Dodging",
            CombatState::Hurt => "Hurt",
            CombatState::Dead => "Dead",
        }
    }

    /// Compact label used by the event log, e.g. `Attacking:Light2`
    pub fn label(self) -> String {
        match self {
            CombatState::Attacking(kind) => format!("Attacking:{}", kind.name()),
            other => other.name().to_string(),
        }
    }

    pub fn from_label(label: &str) -> Option<CombatState> {
        if let Some(kind) = label.strip_prefix("Attacking:") {
            return AttackKind::from_name(kind).map(CombatState::Attacking);
        }
        match label {
            "Idle" => Some(CombatState::Idle),
            "Moving" => Some(CombatState::Moving),
            "Jumping" => Some(CombatState::Jumping),
            "Falling" => Some(CombatState::Falling),
            "Dodging" => Some(CombatState::Dodging),
            "Hurt" => Some(CombatState::Hurt),
            "Dead" => Some(CombatState::Dead),
            _ => None,
        }
    }

    pub fn attack(self) -> Option<AttackKind> {
        match self {
            CombatState::Attacking(kind) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_labels_parse_back() {
        let states = [
            CombatState::Idle,
            CombatState::Falling,
            CombatState::Attacking(AttackKind::Light(ComboPhase::Second)),
            CombatState::Attacking(AttackKind::Strike),
            CombatState::Dead,
        ];
        for state in states {
            assert_eq!(CombatState::from_label(&state.label()), Some(state));
        }
        assert_eq!(CombatState::from_label("Attacking:Kick"), None);
    }

    #[test]
    fn test_facing_from_direction() {
        assert_eq!(Facing::from_direction(0.4), Some(Facing::Right));
        assert_eq!(Facing::from_direction(-1.0), Some(Facing::Left));
        assert_eq!(Facing::from_direction(0.0), None);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
