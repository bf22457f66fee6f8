//! Physics module - the rigid-body world the combat core talks to
//!
//! The core only sees `PhysicsWorld`. `ArenaPhysics` is the small AABB
//! world shipped with the game: gravity, static platform resolution,
//! impulses, box queries and begin/end contact tracking.

mod arena;
mod contact;

pub use arena::ArenaPhysics;
pub use contact::{ContactHandler, ContactRouter, ground_contact};

use bevy::prelude::*;

/// Opaque handle to a body owned by a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Faction tag carried by every fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureTag {
    Player,
    Enemy,
    Platform,
}

/// Box body description (one fixture per body)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub density: f32,
    pub tag: FixtureTag,
}

impl BodyDef {
    pub fn dynamic_box(position: Vec2, half_extents: Vec2, tag: FixtureTag) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            half_extents,
            density: crate::constants::BODY_DENSITY,
            tag,
        }
    }

    pub fn static_box(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            half_extents,
            density: 0.0,
            tag: FixtureTag::Platform,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    pub body: BodyHandle,
    pub tag: FixtureTag,
}

/// Axis-aligned box in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// Two fixtures started or stopped touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub a: Fixture,
    pub b: Fixture,
}

impl ContactEvent {
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.a.body == body || self.b.body == body
    }

    /// The fixture on the other side of `body`, if `body` is involved
    pub fn other(&self, body: BodyHandle) -> Option<Fixture> {
        if self.a.body == body {
            Some(self.b)
        } else if self.b.body == body {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Interface the game loop and combat core use. Unknown handles degrade to
/// zero values and no-ops.
pub trait PhysicsWorld {
    fn create_body(&mut self, def: BodyDef) -> BodyHandle;
    fn destroy_body(&mut self, body: BodyHandle);
    fn set_active(&mut self, body: BodyHandle, active: bool);
    fn is_active(&self, body: BodyHandle) -> bool;
    fn position(&self, body: BodyHandle) -> Vec2;
    fn linear_velocity(&self, body: BodyHandle) -> Vec2;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2);
    /// Fixtures of active bodies overlapping `area`
    fn query_aabb(&self, area: Aabb) -> Vec<Fixture>;
    /// Advance the world and report contact changes
    fn step(&mut self, dt: f32) -> Vec<ContactEvent>;
    fn body_count(&self) -> usize;
}
