//! Nightpaw - a 2D action-platformer core built with Bevy
//!
//! Player and enemy combat state machines, grid pathfinding for enemy
//! pursuit, and a combat resolver, all driven by a frame-stepped
//! `GameSession` that the windowed game and the headless tools share.

// Core modules
pub mod constants;
pub mod events;
pub mod helpers;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Game logic modules
pub mod ai;
pub mod animation;
pub mod combat;
pub mod enemy;
pub mod input;
pub mod levels;
pub mod physics;
pub mod player;
pub mod session;

// Front end
pub mod ui;
pub mod world;

// Re-export commonly used types for convenience
pub use ai::{GridNode, PathResult, PursuitDecision, WalkabilityGrid, find_path, follow_player};
pub use animation::{AnimationClip, AnimationLibrary, ClipId, SheetDef, SpriteFrame};
pub use combat::{
    AttackCommit, AttackKind, AttackSpec, Capabilities, ComboPhase, CombatAction, CombatEvent,
    CombatMachine, CombatState, CombatTimer, DodgeSpec, Facing, Motion, resolve_strike,
    strike_box,
};
pub use constants::*;
pub use enemy::Enemy;
pub use events::{
    ActorId, BusEvent, EventBus, GameEvent, parse_event, parse_log, serialize_event,
};
pub use helpers::*;
pub use input::PlayerCommands;
pub use levels::{LevelData, LevelDatabase, PlatformDef};
pub use physics::{
    Aabb, ArenaPhysics, BodyDef, BodyHandle, BodyKind, ContactEvent, ContactPhase, ContactRouter,
    Fixture, FixtureTag, PhysicsWorld,
};
pub use player::Player;
pub use session::GameSession;
pub use tuning::{COMBAT_TUNING_FILE, CombatTuning};
pub use ui::{HealthBar, HealthBarFill};
pub use world::{ActiveSession, ActorSprite, LevelPlatform, SheetAtlases};
