//! Generic timed combat state machine
//!
//! The machine never touches the physics world. Callers read the body
//! velocity into a `Motion`, feed actions and the frame delta, then
//! `write_back` the resulting velocity and impulse to the body.

use bevy::prelude::Vec2;

use super::{AttackKind, Capabilities, ComboPhase, CombatState, CombatTimer, Facing};
use crate::constants::STICK_DEADZONE;
use crate::helpers::axis_direction;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Commands a policy (input or AI) can issue to a combat actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatAction {
    /// Horizontal steering in [-1, 1]; zero stops
    Move(f32),
    /// Grounded jump
    Jump,
    /// Unconditional upward impulse (pathing step-up)
    Leap,
    LightAttack,
    HeavyAttack,
    Strike,
    Dodge,
}

/// Things that happened inside the machine since the last drain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    StateChanged { from: CombatState, to: CombatState },
    AttackCommitted(AttackKind),
    Jumped,
    DodgeStarted,
    Damaged { amount: f32, health: f32 },
    Died,
}

/// Velocity/impulse scratch pad for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub velocity: Vec2,
    pub impulse: Vec2,
    initial: Vec2,
}

impl Motion {
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            impulse: Vec2::ZERO,
            initial: velocity,
        }
    }

    /// Velocity at the start of the tick
    pub fn initial_velocity(&self) -> Vec2 {
        self.initial
    }

    pub fn velocity_changed(&self) -> bool {
        self.velocity != self.initial
    }

    /// Push the tick's velocity change and impulse to the body
    pub fn write_back(&self, physics: &mut dyn PhysicsWorld, body: BodyHandle) {
        if self.velocity_changed() {
            physics.set_linear_velocity(body, self.velocity);
        }
        if self.impulse != Vec2::ZERO {
            physics.apply_linear_impulse(body, self.impulse);
        }
    }
}

#[derive(Debug, Clone)]
pub struct CombatMachine {
    caps: Capabilities,
    state: CombatState,
    state_time: f32,
    health: f32,
    facing: Facing,
    grounded: bool,
    airborne: bool,
    combo: u8,
    hurt: CombatTimer,
    invincibility: CombatTimer,
    attack: CombatTimer,
    light: CombatTimer,
    combo_window: CombatTimer,
    dodge: CombatTimer,
    dodge_cooldown: CombatTimer,
    events: Vec<CombatEvent>,
}

impl CombatMachine {
    pub fn new(caps: Capabilities) -> Self {
        let light_duration = caps.light.map(|a| a.duration).unwrap_or(0.0);
        let (dodge_duration, dodge_cooldown) = caps
            .dodge
            .map(|d| (d.duration, d.cooldown))
            .unwrap_or((0.0, 0.0));
        Self {
            state: CombatState::Idle,
            state_time: 0.0,
            health: caps.max_health,
            facing: Facing::Right,
            grounded: false,
            airborne: false,
            combo: 0,
            hurt: CombatTimer::new(caps.hurt_duration),
            invincibility: CombatTimer::new(caps.invincibility_duration),
            attack: CombatTimer::new(0.0),
            light: CombatTimer::new(light_duration),
            combo_window: CombatTimer::new(caps.combo_window.unwrap_or(0.0)),
            dodge: CombatTimer::new(dodge_duration),
            dodge_cooldown: CombatTimer::new(dodge_cooldown),
            events: Vec::new(),
            caps,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Interpret one action. Returns true if it took effect.
    pub fn apply(&mut self, action: CombatAction, motion: &mut Motion) -> bool {
        if self.is_dead() {
            return false;
        }
        match action {
            CombatAction::Move(axis) => {
                self.steer(axis, motion);
                true
            }
            CombatAction::Jump => self.jump(motion),
            CombatAction::Leap => {
                motion.impulse.y += self.caps.jump_impulse;
                self.events.push(CombatEvent::Jumped);
                true
            }
            CombatAction::LightAttack => self.light_attack(),
            CombatAction::HeavyAttack => {
                if self.light.is_running() {
                    return false;
                }
                let kind = if self.airborne {
                    AttackKind::Air
                } else {
                    AttackKind::Heavy
                };
                self.begin_attack(kind)
            }
            CombatAction::Strike => self.begin_attack(AttackKind::Strike),
            CombatAction::Dodge => self.begin_dodge(motion),
        }
    }

    fn steer(&mut self, axis: f32, motion: &mut Motion) {
        let direction = axis_direction(axis, STICK_DEADZONE);
        motion.velocity.x = direction * self.caps.move_speed;
        if let Some(facing) = Facing::from_direction(direction) {
            self.facing = facing;
        }
        if !self.caps.infer_motion && !self.is_busy() && !self.dodge.is_running() {
            let next = if direction != 0.0 {
                CombatState::Moving
            } else {
                CombatState::Idle
            };
            self.set_state(next);
        }
    }

    fn jump(&mut self, motion: &mut Motion) -> bool {
        if !self.grounded {
            return false;
        }
        motion.velocity.y = 0.0;
        motion.impulse.y += self.caps.jump_impulse;
        self.grounded = false;
        self.airborne = true;
        self.events.push(CombatEvent::Jumped);
        true
    }

    fn light_attack(&mut self) -> bool {
        let Some(params) = self.caps.light else {
            return false;
        };
        if self.hurt.is_running() {
            return false;
        }
        let light_active = self.light.is_running();
        let chain = self.combo == 1 && (light_active || self.combo_window.is_running());
        let fresh = !light_active && !self.attack.is_running();
        if !fresh && !(light_active && chain) {
            return false;
        }
        if self.airborne {
            return self.begin_attack(AttackKind::Air);
        }

        let phase = if chain {
            self.combo = 2;
            ComboPhase::Second
        } else {
            self.combo = 1;
            ComboPhase::First
        };
        self.combo_window.reset();
        self.light.start_with(params.duration);
        let kind = AttackKind::Light(phase);
        self.set_state(CombatState::Attacking(kind));
        self.events.push(CombatEvent::AttackCommitted(kind));
        true
    }

    fn begin_attack(&mut self, kind: AttackKind) -> bool {
        let Some(params) = self.caps.attack(kind).copied() else {
            return false;
        };
        if self.hurt.is_running() || self.attack.is_running() || self.dodge.is_running() {
            return false;
        }
        self.attack.start_with(params.duration);
        self.set_state(CombatState::Attacking(kind));
        self.events.push(CombatEvent::AttackCommitted(kind));
        true
    }

    fn begin_dodge(&mut self, motion: &mut Motion) -> bool {
        let Some(params) = self.caps.dodge else {
            return false;
        };
        if self.dodge_cooldown.is_running()
            || self.dodge.is_running()
            || self.attack.is_running()
            || self.light.is_running()
        {
            return false;
        }
        self.dodge.start_with(params.duration);
        self.dodge_cooldown.start_with(params.cooldown);
        motion.velocity = Vec2::new(params.speed * self.facing.sign(), motion.velocity.y * 0.5);
        self.set_state(CombatState::Dodging);
        self.events.push(CombatEvent::DodgeStarted);
        true
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Run every timer for one frame. Order: hurt, invincibility, light,
    /// combo window, dodge, dodge cooldown, attack.
    pub fn advance(&mut self, dt: f32, motion: &mut Motion) {
        self.state_time += dt;
        if self.is_dead() {
            return;
        }

        if self.hurt.tick(dt) && self.health > 0.0 {
            self.set_state(CombatState::Idle);
        }
        self.invincibility.tick(dt);

        if self.light.tick(dt) {
            match self.combo {
                1 => self.combo_window.start(),
                2 => self.combo = 0,
                _ => {}
            }
            let next = if self.airborne {
                if motion.velocity.y < 0.0 {
                    CombatState::Falling
                } else {
                    CombatState::Jumping
                }
            } else {
                CombatState::Idle
            };
            self.set_state(next);
        }
        if self.combo == 1 && !self.light.is_running() && self.combo_window.tick(dt) {
            self.combo = 0;
        }

        if let Some(params) = self.caps.dodge {
            if self.dodge.is_running() {
                if self.dodge.tick(dt) {
                    motion.velocity.x *= 0.5;
                    self.set_state(self.settled_state());
                } else {
                    motion.velocity.x =
                        params.speed * (1.0 - self.dodge.progress()) * self.facing.sign();
                }
            }
        }
        self.dodge_cooldown.tick(dt);

        if self.attack.tick(dt) {
            self.set_state(self.settled_state());
        }
    }

    /// Derive the locomotion state from the velocity this tick will write
    /// back (after input and timers). Skipped while any attack, dodge or hurt
    /// is in progress.
    pub fn infer_motion_state(&mut self, velocity: Vec2) {
        if !self.caps.infer_motion || self.is_dead() {
            return;
        }
        if self.light.is_running()
            || self.attack.is_running()
            || self.dodge.is_running()
            || self.hurt.is_running()
        {
            return;
        }
        let threshold = self.caps.motion_threshold;
        if velocity.y.abs() > threshold {
            self.airborne = true;
            let next = if velocity.y < 0.0 {
                CombatState::Falling
            } else {
                CombatState::Jumping
            };
            self.set_state(next);
        } else {
            self.airborne = false;
            let next = if velocity.x.abs() > threshold {
                CombatState::Moving
            } else {
                CombatState::Idle
            };
            self.set_state(next);
        }
    }

    /// State after an attack or dodge ends. Without motion inference nothing
    /// would leave Falling again, so those machines always settle to Idle.
    fn settled_state(&self) -> CombatState {
        if self.caps.infer_motion && self.airborne {
            CombatState::Falling
        } else {
            CombatState::Idle
        }
    }

    // =========================================================================
    // Damage
    // =========================================================================

    /// Apply damage. Returns false when ignored (dead or invincible).
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() || self.invincibility.is_running() {
            return false;
        }
        let amount = amount.max(0.0);
        self.health = (self.health - amount).clamp(0.0, self.caps.max_health);
        self.events.push(CombatEvent::Damaged {
            amount,
            health: self.health,
        });

        if self.health <= 0.0 {
            self.die();
            return true;
        }

        self.hurt.start_with(self.caps.hurt_duration);
        if self.caps.invincibility_duration > 0.0 {
            self.invincibility.start_with(self.caps.invincibility_duration);
        }
        if self.caps.hurt_interrupts_attack {
            self.attack.stop();
        }
        self.set_state(CombatState::Hurt);
        true
    }

    /// Override health directly (scenario setup). Zero kills.
    pub fn set_health(&mut self, health: f32) {
        if self.is_dead() {
            return;
        }
        self.health = health.clamp(0.0, self.caps.max_health);
        if self.health <= 0.0 {
            self.die();
        }
    }

    fn die(&mut self) {
        for timer in [
            &mut self.hurt,
            &mut self.invincibility,
            &mut self.attack,
            &mut self.light,
            &mut self.combo_window,
            &mut self.dodge,
            &mut self.dodge_cooldown,
        ] {
            timer.stop();
        }
        self.combo = 0;
        self.set_state(CombatState::Dead);
        self.events.push(CombatEvent::Died);
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    pub fn begin_ground_contact(&mut self) {
        self.grounded = true;
        self.airborne = false;
    }

    pub fn end_ground_contact(&mut self) {
        self.airborne = true;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    fn set_state(&mut self, next: CombatState) {
        if next == self.state {
            return;
        }
        self.events.push(CombatEvent::StateChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
        self.state_time = 0.0;
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    /// Seconds since the last state change
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.caps.max_health
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn is_dead(&self) -> bool {
        self.state == CombatState::Dead
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge.is_running()
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt.is_running()
    }

    /// Hurt or mid-attack; enemies skip steering while busy
    pub fn is_busy(&self) -> bool {
        self.hurt.is_running() || self.attack.is_running()
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_running()
    }

    pub fn can_dodge(&self) -> bool {
        self.caps.dodge.is_some() && !self.dodge_cooldown.is_running()
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn combo(&self) -> u8 {
        self.combo
    }

    pub fn attack_elapsed(&self) -> f32 {
        self.attack.elapsed()
    }

    pub fn light_elapsed(&self) -> f32 {
        self.light.elapsed()
    }

    pub fn dodge_elapsed(&self) -> f32 {
        self.dodge.elapsed()
    }
}
