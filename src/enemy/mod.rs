//! Enemy module - pathfinding melee actor
//!
//! Enemies re-plan toward the player every tick while free to act. The
//! strike resolves at commit: the returned `AttackCommit` is applied to the
//! player straight away by the session.

use bevy::prelude::*;

use crate::ai::{PursuitDecision, WalkabilityGrid, follow_player};
use crate::animation::{AnimationLibrary, ClipId, SpriteFrame};
use crate::combat::{
    AttackCommit, Capabilities, CombatAction, CombatMachine, CombatState, Facing, Motion,
};
use crate::physics::{BodyDef, BodyHandle, FixtureTag, PhysicsWorld};

#[derive(Debug, Clone)]
pub struct Enemy {
    index: usize,
    body: BodyHandle,
    machine: CombatMachine,
}

impl Enemy {
    pub fn spawn(
        physics: &mut dyn PhysicsWorld,
        index: usize,
        position: Vec2,
        caps: Capabilities,
    ) -> Self {
        let body = physics.create_body(BodyDef::dynamic_box(
            position,
            caps.half_extents,
            FixtureTag::Enemy,
        ));
        Self {
            index,
            body,
            machine: CombatMachine::new(caps),
        }
    }

    /// Timers first; steering and striking only once hurt/attack have ended.
    pub fn update(
        &mut self,
        dt: f32,
        grid: &WalkabilityGrid,
        player_pos: Vec2,
        physics: &mut dyn PhysicsWorld,
    ) -> Option<AttackCommit> {
        let mut motion = Motion::new(physics.linear_velocity(self.body));
        self.machine.advance(dt, &mut motion);
        if self.machine.is_dead() || self.machine.is_busy() {
            motion.write_back(physics, self.body);
            return None;
        }

        let position = physics.position(self.body);
        let range = self.strike_range();
        let mut commit = None;
        match follow_player(grid, position, player_pos, range) {
            PursuitDecision::Advance { direction, leap, .. } => {
                self.machine.apply(CombatAction::Move(direction), &mut motion);
                if leap {
                    self.machine.apply(CombatAction::Leap, &mut motion);
                }
            }
            PursuitDecision::Engage { distance } => {
                if self.machine.apply(CombatAction::Strike, &mut motion) {
                    debug!("Enemy {} strikes at distance {:.2}", self.index, distance);
                    commit = AttackCommit::from_machine(&self.machine, self.body, position);
                }
                self.machine.apply(CombatAction::Move(0.0), &mut motion);
            }
            PursuitDecision::Hold => {
                self.machine.apply(CombatAction::Move(0.0), &mut motion);
            }
        }

        motion.write_back(physics, self.body);
        commit
    }

    pub fn take_damage(&mut self, amount: f32, physics: &mut dyn PhysicsWorld) -> bool {
        if !self.machine.take_damage(amount) {
            return false;
        }
        if self.machine.is_dead() {
            physics.set_active(self.body, false);
            info!("Enemy {} died", self.index);
        }
        true
    }

    fn strike_range(&self) -> f32 {
        self.machine
            .capabilities()
            .strike
            .map(|strike| strike.range)
            .unwrap_or(0.0)
    }

    /// Frame to draw at `position` (the body center). None if the clip is missing.
    pub fn render(&self, library: &AnimationLibrary, position: Vec2) -> Option<SpriteFrame> {
        let clock = self.machine.state_time();
        let (id, clock, looping) = match self.machine.state() {
            CombatState::Dead => (ClipId::EnemyDeath, clock, false),
            CombatState::Hurt => (ClipId::EnemyHurt, clock, false),
            CombatState::Attacking(_) => (ClipId::EnemyAttack, self.machine.attack_elapsed(), false),
            CombatState::Moving => (ClipId::EnemyWalk, clock, true),
            _ => (ClipId::EnemyIdle, clock, true),
        };
        let clip = library.clip(id)?;
        Some(SpriteFrame {
            clip: id,
            sheet: clip.sheet,
            index: clip.sheet_index(clock, looping),
            flip_x: self.machine.facing() == Facing::Left,
            size: self.machine.capabilities().half_extents * 2.0,
            position,
        })
    }

    pub fn dispose(&self, physics: &mut dyn PhysicsWorld) {
        physics.destroy_body(self.body);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn machine(&self) -> &CombatMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut CombatMachine {
        &mut self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackKind, CombatEvent};
    use crate::physics::ArenaPhysics;
    use crate::tuning::CombatTuning;

    const DT: f32 = 1.0 / 64.0;

    fn floor_grid() -> WalkabilityGrid {
        let anchors: Vec<Vec2> = (0..=7).map(|x| Vec2::new(x as f32, 1.0)).collect();
        WalkabilityGrid::build(8, 5, &anchors)
    }

    fn spawn_at(physics: &mut ArenaPhysics, position: Vec2) -> Enemy {
        Enemy::spawn(physics, 0, position, Capabilities::enemy(&CombatTuning::default()))
    }

    #[test]
    fn test_walks_toward_player_on_same_run() {
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut enemy = spawn_at(&mut physics, Vec2::new(5.5, 1.25));
        let commit = enemy.update(DT, &floor_grid(), Vec2::new(1.5, 1.25), &mut physics);
        assert!(commit.is_none());
        assert_eq!(enemy.machine().state(), CombatState::Moving);
        assert_eq!(enemy.machine().facing(), Facing::Left);
        assert_eq!(physics.linear_velocity(enemy.body()).x, -0.4);
    }

    #[test]
    fn test_strikes_once_per_commit() {
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut enemy = spawn_at(&mut physics, Vec2::new(2.8, 1.25));
        let player_pos = Vec2::new(2.2, 1.25);
        let grid = floor_grid();

        let mut commits = Vec::new();
        // The 0.6s strike runs out 39 ticks after its commit; the next one follows
        for _ in 0..40 {
            commits.extend(enemy.update(DT, &grid, player_pos, &mut physics));
        }
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].kind, AttackKind::Strike);
        assert_eq!(commits[0].attack.damage, 10.0);
    }

    #[test]
    fn test_contact_end_does_not_strand_enemy_in_falling() {
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut enemy = spawn_at(&mut physics, Vec2::new(2.8, 1.25));
        let grid = floor_grid();
        assert!(enemy.update(DT, &grid, Vec2::new(2.2, 1.25), &mut physics).is_some());
        enemy.machine_mut().begin_ground_contact();
        enemy.machine_mut().end_ground_contact();
        enemy.machine_mut().drain_events();

        for _ in 0..38 {
            assert!(enemy.update(DT, &grid, Vec2::new(2.2, 1.25), &mut physics).is_none());
        }
        // Strike expires on this update, then the enemy walks after the player
        enemy.update(DT, &grid, Vec2::new(6.2, 1.25), &mut physics);
        let states: Vec<CombatState> = enemy
            .machine_mut()
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                CombatEvent::StateChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(states, vec![CombatState::Idle, CombatState::Moving]);
        assert_eq!(enemy.machine().facing(), Facing::Right);
        assert_eq!(physics.linear_velocity(enemy.body()).x, 0.4);
    }

    #[test]
    fn test_disconnected_enemy_holds() {
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut anchors: Vec<Vec2> = (0..=2).map(|x| Vec2::new(x as f32, 1.0)).collect();
        anchors.extend((5..=7).map(|x| Vec2::new(x as f32, 2.15)));
        let grid = WalkabilityGrid::build(8, 5, &anchors);
        let mut enemy = spawn_at(&mut physics, Vec2::new(6.0, 2.4));
        for _ in 0..200 {
            assert!(enemy.update(DT, &grid, Vec2::new(1.5, 1.25), &mut physics).is_none());
        }
        assert_eq!(enemy.machine().state(), CombatState::Idle);
    }

    #[test]
    fn test_hurt_interrupts_strike() {
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut enemy = spawn_at(&mut physics, Vec2::new(2.8, 1.25));
        assert!(enemy.update(DT, &floor_grid(), Vec2::new(2.2, 1.25), &mut physics).is_some());
        assert!(enemy.take_damage(15.0, &mut physics));
        assert_eq!(enemy.machine().state(), CombatState::Hurt);
        assert_eq!(enemy.machine().health(), 35.0);
        // Hurt lasts 32 ticks; no strike meanwhile
        for _ in 0..31 {
            assert!(enemy.update(DT, &floor_grid(), Vec2::new(2.2, 1.25), &mut physics).is_none());
        }
    }

    #[test]
    fn test_death_deactivates_body() {
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut enemy = spawn_at(&mut physics, Vec2::new(2.8, 1.25));
        assert!(enemy.take_damage(25.0, &mut physics));
        assert!(enemy.take_damage(25.0, &mut physics));
        assert!(enemy.machine().is_dead());
        assert!(!physics.is_active(enemy.body()));
        assert!(!enemy.take_damage(25.0, &mut physics));
    }

    #[test]
    fn test_render_death_clip() {
        let library = AnimationLibrary::parse(
            "sheet: enemy_die sprites/enemy/Enemy3_Die.png 32 32 4 1\n\
             clip: enemy_death enemy_die 0 4 0.1\n",
        );
        let mut physics = ArenaPhysics::new(Vec2::ZERO);
        let mut enemy = spawn_at(&mut physics, Vec2::new(2.8, 1.25));
        assert!(enemy.render(&library, Vec2::new(2.8, 1.25)).is_none());
        enemy.take_damage(50.0, &mut physics);
        let frame = enemy.render(&library, Vec2::new(2.8, 1.25));
        let frame = frame.expect("death frame");
        assert_eq!(frame.clip, ClipId::EnemyDeath);
        assert_eq!(frame.size, Vec2::splat(0.5));
    }
}
