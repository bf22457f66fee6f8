//! Event type definitions for the gameplay event log

use serde::{Deserialize, Serialize};

use crate::combat::{AttackKind, CombatEvent, CombatState};

/// Actor identifier: the player or an enemy by spawn index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorId {
    Player,
    Enemy(usize),
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorId::Player => write!(f, "P"),
            ActorId::Enemy(index) => write!(f, "E{}", index),
        }
    }
}

impl std::str::FromStr for ActorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "P" {
            return Ok(ActorId::Player);
        }
        s.strip_prefix('E')
            .and_then(|n| n.parse().ok())
            .map(ActorId::Enemy)
            .ok_or_else(|| format!("Unknown actor '{}'", s))
    }
}

/// All gameplay events that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Session built for a level
    LevelStart { level: String, enemies: usize },
    /// Actor changed combat state
    StateChange {
        actor: ActorId,
        from: CombatState,
        to: CombatState,
    },
    /// Attack committed (strike box resolved this frame)
    AttackCommit { actor: ActorId, kind: AttackKind },
    /// Damage applied
    Damage {
        actor: ActorId,
        amount: f32,
        health: f32,
    },
    /// Actor died
    Death { actor: ActorId },
    /// Jump or pathing leap
    Jump { actor: ActorId },
    /// Dodge started
    Dodge { actor: ActorId },
}

impl GameEvent {
    pub fn from_combat(actor: ActorId, event: CombatEvent) -> Self {
        match event {
            CombatEvent::StateChanged { from, to } => GameEvent::StateChange { actor, from, to },
            CombatEvent::AttackCommitted(kind) => GameEvent::AttackCommit { actor, kind },
            CombatEvent::Damaged { amount, health } => GameEvent::Damage {
                actor,
                amount,
                health,
            },
            CombatEvent::Died => GameEvent::Death { actor },
            CombatEvent::Jumped => GameEvent::Jump { actor },
            CombatEvent::DodgeStarted => GameEvent::Dodge { actor },
        }
    }

    /// Get the event type code for compact serialization
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::LevelStart { .. } => "LS",
            GameEvent::StateChange { .. } => "SC",
            GameEvent::AttackCommit { .. } => "AC",
            GameEvent::Damage { .. } => "DM",
            GameEvent::Death { .. } => "DE",
            GameEvent::Jump { .. } => "J",
            GameEvent::Dodge { .. } => "DG",
        }
    }

    /// Event name used by scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::LevelStart { .. } => "LevelStart",
            GameEvent::StateChange { .. } => "StateChange",
            GameEvent::AttackCommit { .. } => "AttackCommit",
            GameEvent::Damage { .. } => "Damage",
            GameEvent::Death { .. } => "Death",
            GameEvent::Jump { .. } => "Jump",
            GameEvent::Dodge { .. } => "Dodge",
        }
    }

    pub fn actor(&self) -> Option<ActorId> {
        match self {
            GameEvent::LevelStart { .. } => None,
            GameEvent::StateChange { actor, .. }
            | GameEvent::AttackCommit { actor, .. }
            | GameEvent::Damage { actor, .. }
            | GameEvent::Death { actor }
            | GameEvent::Jump { actor }
            | GameEvent::Dodge { actor } => Some(*actor),
        }
    }

    /// Variant-specific detail: attack name, or the state entered
    pub fn detail(&self) -> Option<String> {
        match self {
            GameEvent::AttackCommit { kind, .. } => Some(kind.name().to_string()),
            GameEvent::StateChange { to, .. } => Some(to.label()),
            _ => None,
        }
    }
}
