//! Player: one body, one combat machine, commands from input

use bevy::prelude::*;

use crate::combat::{AttackCommit, Capabilities, CombatAction, CombatMachine, Motion};
use crate::constants::DEBUG_SELF_DAMAGE;
use crate::input::PlayerCommands;
use crate::physics::{BodyDef, BodyHandle, FixtureTag, PhysicsWorld};
use crate::ui::HealthBar;

#[derive(Debug, Clone)]
pub struct Player {
    body: BodyHandle,
    machine: CombatMachine,
    health_bar: HealthBar,
}

impl Player {
    pub fn spawn(
        physics: &mut dyn PhysicsWorld,
        position: Vec2,
        caps: Capabilities,
        mut health_bar: HealthBar,
    ) -> Self {
        let body = physics.create_body(BodyDef::dynamic_box(
            position,
            caps.half_extents,
            FixtureTag::Player,
        ));
        health_bar.set_health(caps.max_health);
        Self {
            body,
            machine: CombatMachine::new(caps),
            health_bar,
        }
    }

    /// One tick: input commands, then timers, then movement inference.
    /// Returns the attacks committed this tick for the resolver.
    pub fn update(
        &mut self,
        dt: f32,
        commands: &PlayerCommands,
        physics: &mut dyn PhysicsWorld,
    ) -> Vec<AttackCommit> {
        let mut motion = Motion::new(physics.linear_velocity(self.body));
        let mut commits = Vec::new();

        if !self.machine.is_dead() && !self.machine.is_dodging() {
            let origin = physics.position(self.body);
            if commands.light_attack && self.machine.apply(CombatAction::LightAttack, &mut motion) {
                commits.extend(AttackCommit::from_machine(&self.machine, self.body, origin));
            }
            if commands.heavy_attack && self.machine.apply(CombatAction::HeavyAttack, &mut motion) {
                commits.extend(AttackCommit::from_machine(&self.machine, self.body, origin));
            }
            if commands.self_damage {
                self.take_damage(DEBUG_SELF_DAMAGE, physics);
            }

            let dodged = commands.dodge && self.machine.apply(CombatAction::Dodge, &mut motion);
            if !dodged {
                self.machine.apply(CombatAction::Move(commands.move_x), &mut motion);
            }
            if commands.jump {
                self.machine.apply(CombatAction::Jump, &mut motion);
            }
        }

        self.machine.advance(dt, &mut motion);
        self.machine.infer_motion_state(motion.velocity);
        motion.write_back(physics, self.body);
        commits
    }

    /// Apply damage through the invincibility gate. Returns true if it landed.
    pub fn take_damage(&mut self, amount: f32, physics: &mut dyn PhysicsWorld) -> bool {
        if !self.machine.take_damage(amount) {
            return false;
        }
        self.sync_health(physics);
        true
    }

    /// Scenario setup: force health (zero kills)
    pub fn set_health(&mut self, health: f32, physics: &mut dyn PhysicsWorld) {
        self.machine.set_health(health);
        self.sync_health(physics);
    }

    fn sync_health(&mut self, physics: &mut dyn PhysicsWorld) {
        self.health_bar.set_health(self.machine.health());
        if self.machine.is_dead() && physics.is_active(self.body) {
            physics.set_active(self.body, false);
            info!("Player died");
        }
    }

    pub fn dispose(&self, physics: &mut dyn PhysicsWorld) {
        physics.destroy_body(self.body);
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

    pub fn health_bar(&self) -> &HealthBar {
        &self.health_bar
    }
}
