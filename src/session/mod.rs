//! Game session - one level's physics world, actors, grid and event bus
//!
//! The session is frame-stepped and single-threaded. Both the Bevy front
//! end and the headless runners (scenarios, batch simulation) drive it
//! through `tick`.

use bevy::prelude::*;

use crate::ai::WalkabilityGrid;
use crate::animation::{AnimationLibrary, SpriteFrame};
use crate::combat::{AttackCommit, Capabilities, CombatMachine, resolve_strike};
use crate::constants::*;
use crate::enemy::Enemy;
use crate::events::{ActorId, EventBus, GameEvent};
use crate::input::PlayerCommands;
use crate::levels::LevelData;
use crate::physics::{
    ArenaPhysics, BodyDef, BodyHandle, ContactRouter, FixtureTag, PhysicsWorld, ground_contact,
};
use crate::player::Player;
use crate::tuning::CombatTuning;
use crate::ui::HealthBar;

pub struct GameSession<P: PhysicsWorld = ArenaPhysics> {
    physics: P,
    level: LevelData,
    grid: WalkabilityGrid,
    platforms: Vec<BodyHandle>,
    player: Player,
    enemies: Vec<Enemy>,
    contacts: ContactRouter,
    bus: EventBus,
    elapsed: f32,
    frame: u32,
}

impl GameSession<ArenaPhysics> {
    /// Session on the bundled AABB world
    pub fn from_level(level: &LevelData, tuning: &CombatTuning) -> Self {
        let gravity = level.gravity.unwrap_or(tuning.gravity);
        Self::new(ArenaPhysics::new(Vec2::new(0.0, gravity)), level, tuning)
    }
}

impl<P: PhysicsWorld> GameSession<P> {
    pub fn new(mut physics: P, level: &LevelData, tuning: &CombatTuning) -> Self {
        let platforms = level
            .platforms
            .iter()
            .map(|p| physics.create_body(BodyDef::static_box(p.center(), p.half_extents())))
            .collect();
        let anchors = level.walk_anchors();
        let grid = WalkabilityGrid::build(level.grid_width, level.grid_height, &anchors);

        let health_bar =
            HealthBar::new(HEALTH_BAR_POSITION, HEALTH_BAR_SIZE, tuning.player_max_health);
        let player = Player::spawn(
            &mut physics,
            level.player_spawn,
            Capabilities::player(tuning),
            health_bar,
        );
        let enemies: Vec<Enemy> = level
            .enemy_spawns
            .iter()
            .enumerate()
            .map(|(i, spawn)| Enemy::spawn(&mut physics, i, *spawn, Capabilities::enemy(tuning)))
            .collect();

        let mut contacts = ContactRouter::new();
        contacts.register(player.body(), ActorId::Player, ground_contact);
        for enemy in &enemies {
            contacts.register(enemy.body(), ActorId::Enemy(enemy.index()), ground_contact);
        }

        let mut bus = EventBus::new();
        bus.emit(GameEvent::LevelStart {
            level: level.name.clone(),
            enemies: enemies.len(),
        });
        info!(
            "Level '{}' started: {} enemies, {} walkable cells",
            level.name,
            enemies.len(),
            grid.walkable_count()
        );

        Self {
            physics,
            level: level.clone(),
            grid,
            platforms,
            player,
            enemies,
            contacts,
            bus,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Advance one fixed step. Returns the gameplay events it produced;
    /// the same events are pushed to the session bus.
    pub fn tick(&mut self, dt: f32, commands: &PlayerCommands) -> Vec<GameEvent> {
        self.frame += 1;
        self.elapsed += dt;
        self.bus.update_time(self.elapsed);

        // 1. Physics, then contact handlers
        let contacts = self.physics.step(dt);
        for contact in &contacts {
            for (actor, phase, handler) in self.contacts.dispatch(contact) {
                if let Some(machine) = self.machine_mut(actor) {
                    handler(machine, phase);
                }
            }
        }

        // 2. Player, resolving each commit against enemy fixtures
        let commits = self.player.update(dt, commands, &mut self.physics);
        for commit in &commits {
            self.resolve_player_commit(commit);
        }

        // 3. Enemies in spawn order; strikes land at commit
        let player_pos = self.physics.position(self.player.body());
        for enemy in &mut self.enemies {
            if let Some(commit) = enemy.update(dt, &self.grid, player_pos, &mut self.physics) {
                self.player.take_damage(commit.attack.damage, &mut self.physics);
            }
        }

        let events = self.collect_events();
        self.bus.emit_all(events.iter().cloned());
        events
    }

    fn resolve_player_commit(&mut self, commit: &AttackCommit) {
        for body in resolve_strike(&self.physics, commit, FixtureTag::Enemy) {
            if let Some(enemy) = self.enemies.iter_mut().find(|e| e.body() == body) {
                enemy.take_damage(commit.attack.damage, &mut self.physics);
            }
        }
    }

    fn collect_events(&mut self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self
            .player
            .machine_mut()
            .drain_events()
            .into_iter()
            .map(|e| GameEvent::from_combat(ActorId::Player, e))
            .collect();
        for enemy in &mut self.enemies {
            let actor = ActorId::Enemy(enemy.index());
            events.extend(
                enemy
                    .machine_mut()
                    .drain_events()
                    .into_iter()
                    .map(|e| GameEvent::from_combat(actor, e)),
            );
        }
        events
    }

    /// Destroy every body the session owns
    pub fn dispose(&mut self) {
        self.player.dispose(&mut self.physics);
        for enemy in &self.enemies {
            enemy.dispose(&mut self.physics);
        }
        for platform in self.platforms.drain(..) {
            self.physics.destroy_body(platform);
        }
        self.contacts = ContactRouter::new();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Player first, then enemies in spawn order
    pub fn actors(&self) -> Vec<ActorId> {
        std::iter::once(ActorId::Player)
            .chain(self.enemies.iter().map(|e| ActorId::Enemy(e.index())))
            .collect()
    }

    pub fn machine(&self, actor: ActorId) -> Option<&CombatMachine> {
        match actor {
            ActorId::Player => Some(self.player.machine()),
            ActorId::Enemy(i) => self.enemies.get(i).map(|e| e.machine()),
        }
    }

    fn machine_mut(&mut self, actor: ActorId) -> Option<&mut CombatMachine> {
        match actor {
            ActorId::Player => Some(self.player.machine_mut()),
            ActorId::Enemy(i) => self.enemies.get_mut(i).map(|e| e.machine_mut()),
        }
    }

    pub fn body(&self, actor: ActorId) -> Option<BodyHandle> {
        match actor {
            ActorId::Player => Some(self.player.body()),
            ActorId::Enemy(i) => self.enemies.get(i).map(|e| e.body()),
        }
    }

    pub fn position(&self, actor: ActorId) -> Option<Vec2> {
        self.body(actor).map(|body| self.physics.position(body))
    }

    pub fn render_actor(&self, actor: ActorId, library: &AnimationLibrary) -> Option<SpriteFrame> {
        let position = self.position(actor)?;
        match actor {
            ActorId::Player => self.player.render(library, position),
            ActorId::Enemy(i) => self.enemies.get(i)?.render(library, position),
        }
    }

    /// Scenario setup: override the player's health
    pub fn set_player_health(&mut self, health: f32) {
        self.player.set_health(health, &mut self.physics);
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| !e.machine().is_dead()).count()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn grid(&self) -> &WalkabilityGrid {
        &self.grid
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn platforms(&self) -> &[BodyHandle] {
        &self.platforms
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackKind, CombatState};

    const DT: f32 = 1.0 / 64.0;

    fn session(level: LevelData) -> GameSession {
        GameSession::from_level(&level, &CombatTuning::default())
    }

    fn idle() -> PlayerCommands {
        PlayerCommands::default()
    }

    fn heavy() -> PlayerCommands {
        PlayerCommands {
            heavy_attack: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_level_start_emitted_on_build() {
        let session = session(LevelData::arena());
        let first = &session.bus().peek()[0].event;
        assert_eq!(
            first,
            &GameEvent::LevelStart {
                level: "Arena".to_string(),
                enemies: 2,
            }
        );
        assert_eq!(session.actors().len(), 3);
        assert_eq!(session.physics().body_count(), 4 + 1 + 2);
    }

    #[test]
    fn test_in_range_enemy_damages_once_per_commit() {
        let mut session = session(LevelData::duel());
        let events = session.tick(DT, &idle());
        let commits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::AttackCommit { actor: ActorId::Enemy(0), .. }))
            .count();
        let damage: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Damage {
                    actor: ActorId::Player,
                    health,
                    ..
                } => Some(*health),
                _ => None,
            })
            .collect();
        assert_eq!(commits, 1);
        assert_eq!(damage, vec![90.0]);
        assert_eq!(session.player().health_bar().health(), 90.0);
    }

    #[test]
    fn test_disconnected_enemy_never_attacks() {
        let mut session = session(LevelData::split());
        for _ in 0..300 {
            let events = session.tick(DT, &idle());
            assert!(!events.iter().any(|e| matches!(e, GameEvent::AttackCommit { .. })));
        }
        assert_eq!(session.player().machine().health(), 100.0);
        let enemy = session.machine(ActorId::Enemy(0)).map(|m| m.state());
        assert_ne!(enemy, Some(CombatState::Attacking(AttackKind::Strike)));
    }

    #[test]
    fn test_player_heavy_kills_enemy() {
        let mut session = session(LevelData::duel());
        let mut deaths = 0;
        for frame in 1..=40 {
            let commands = if frame == 1 || frame == 20 { heavy() } else { idle() };
            let events = session.tick(DT, &commands);
            deaths += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Death { actor: ActorId::Enemy(0) }))
                .count();
        }
        assert_eq!(deaths, 1);
        assert_eq!(session.enemies_alive(), 0);
        let body = session.enemies()[0].body();
        assert!(!session.physics().is_active(body));
        // The enemy was hurt before it could swing back
        assert_eq!(session.player().machine().health(), 100.0);
    }

    #[test]
    fn test_enemy_never_falls_after_player_walks_through() {
        let mut session = session(LevelData::duel());
        let walk = PlayerCommands {
            move_x: 1.0,
            ..Default::default()
        };
        let mut lost_contact = false;
        for frame in 1..=240 {
            let commands = if frame <= 150 { walk } else { idle() };
            session.tick(DT, &commands);
            let Some(enemy) = session.machine(ActorId::Enemy(0)) else {
                panic!("enemy0 missing");
            };
            lost_contact |= enemy.is_airborne();
            assert_ne!(enemy.state(), CombatState::Falling, "frame {}", frame);
        }
        assert!(lost_contact);
    }

    #[test]
    fn test_grounded_after_landing() {
        let mut session = session(LevelData::training());
        for _ in 0..5 {
            session.tick(DT, &idle());
        }
        assert!(session.player().machine().is_grounded());
    }

    #[test]
    fn test_render_without_clips_is_none() {
        let session = session(LevelData::duel());
        let library = AnimationLibrary::default();
        assert!(session.render_actor(ActorId::Player, &library).is_none());
        assert!(session.render_actor(ActorId::Enemy(3), &library).is_none());
    }

    #[test]
    fn test_dispose_destroys_bodies() {
        let mut session = session(LevelData::arena());
        session.dispose();
        assert_eq!(session.physics().body_count(), 0);
    }
}
