//! AABB arena world: gravity, platform resolution, impulses, contacts

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::{
    Aabb, BodyDef, BodyHandle, BodyKind, ContactEvent, ContactPhase, Fixture, PhysicsWorld,
};
use crate::constants::COLLISION_EPSILON;

#[derive(Debug, Clone)]
struct Body {
    def: BodyDef,
    position: Vec2,
    velocity: Vec2,
    mass: f32,
    active: bool,
}

impl Body {
    fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.def.half_extents)
    }

    fn fixture(&self, handle: BodyHandle) -> Fixture {
        Fixture {
            body: handle,
            tag: self.def.tag,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArenaPhysics {
    gravity: Vec2,
    bodies: Vec<Option<Body>>,
    touching: BTreeMap<(u32, u32), (Fixture, Fixture)>,
}

impl ArenaPhysics {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            touching: BTreeMap::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize).and_then(|b| b.as_ref())
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize).and_then(|b| b.as_mut())
    }

    /// Push a dynamic body out of one static box along the smallest overlap
    fn resolve_static(body: &mut Body, platform_pos: Vec2, platform_half: Vec2) {
        let half = body.def.half_extents;
        let diff = body.position - platform_pos;
        let overlap_x = half.x + platform_half.x - diff.x.abs();
        let overlap_y = half.y + platform_half.y - diff.y.abs();

        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return;
        }

        if overlap_y < overlap_x {
            if diff.y > 0.0 {
                // Land on top, staying EPSILON inside so the contact persists
                body.position.y = platform_pos.y + platform_half.y + half.y - COLLISION_EPSILON;
                if body.velocity.y <= 0.0 {
                    body.velocity.y = 0.0;
                }
            } else {
                body.position.y = platform_pos.y - platform_half.y - half.y + COLLISION_EPSILON;
                if body.velocity.y > 0.0 {
                    body.velocity.y = 0.0;
                }
            }
        } else if diff.x > 0.0 {
            body.position.x = platform_pos.x + platform_half.x + half.x - COLLISION_EPSILON;
        } else {
            body.position.x = platform_pos.x - platform_half.x - half.x + COLLISION_EPSILON;
        }
    }

    fn current_contacts(&self) -> BTreeMap<(u32, u32), (Fixture, Fixture)> {
        let mut contacts = BTreeMap::new();
        for (i, a) in self.bodies.iter().enumerate() {
            let Some(a) = a.as_ref().filter(|b| b.active) else {
                continue;
            };
            for (j, b) in self.bodies.iter().enumerate().skip(i + 1) {
                let Some(b) = b.as_ref().filter(|b| b.active) else {
                    continue;
                };
                if a.def.kind == BodyKind::Static && b.def.kind == BodyKind::Static {
                    continue;
                }
                if a.aabb().overlaps(&b.aabb()) {
                    let fa = a.fixture(BodyHandle(i as u32));
                    let fb = b.fixture(BodyHandle(j as u32));
                    contacts.insert((i as u32, j as u32), (fa, fb));
                }
            }
        }
        contacts
    }
}

impl Default for ArenaPhysics {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, crate::constants::DEFAULT_GRAVITY))
    }
}

impl PhysicsWorld for ArenaPhysics {
    fn create_body(&mut self, def: BodyDef) -> BodyHandle {
        let area = def.half_extents.x * def.half_extents.y * 4.0;
        let mass = def.density * area;
        let body = Body {
            def,
            position: def.position,
            velocity: Vec2::ZERO,
            mass: if mass > 0.0 { mass } else { 1.0 },
            active: true,
        };
        self.bodies.push(Some(body));
        BodyHandle((self.bodies.len() - 1) as u32)
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if let Some(slot) = self.bodies.get_mut(body.0 as usize) {
            *slot = None;
        }
        self.touching
            .retain(|&(a, b), _| a != body.0 && b != body.0);
    }

    fn set_active(&mut self, body: BodyHandle, active: bool) {
        if let Some(b) = self.body_mut(body) {
            b.active = active;
        }
    }

    fn is_active(&self, body: BodyHandle) -> bool {
        self.body(body).is_some_and(|b| b.active)
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        self.body(body).map(|b| b.position).unwrap_or(Vec2::ZERO)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.body(body).map(|b| b.velocity).unwrap_or(Vec2::ZERO)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.body_mut(body) {
            if b.def.kind == BodyKind::Dynamic {
                b.velocity = velocity;
            }
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(b) = self.body_mut(body) {
            if b.def.kind == BodyKind::Dynamic {
                b.velocity += impulse / b.mass;
            }
        }
    }

    fn query_aabb(&self, area: Aabb) -> Vec<Fixture> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| {
                let b = b.as_ref()?;
                (b.active && b.aabb().overlaps(&area)).then(|| b.fixture(BodyHandle(i as u32)))
            })
            .collect()
    }

    fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        let platforms: Vec<(Vec2, Vec2)> = self
            .bodies
            .iter()
            .flatten()
            .filter(|b| b.active && b.def.kind == BodyKind::Static)
            .map(|b| (b.position, b.def.half_extents))
            .collect();

        let gravity = self.gravity;
        for body in self.bodies.iter_mut().flatten() {
            if !body.active || body.def.kind != BodyKind::Dynamic {
                continue;
            }
            body.velocity += gravity * dt;
            body.position += body.velocity * dt;
            for &(platform_pos, platform_half) in &platforms {
                Self::resolve_static(body, platform_pos, platform_half);
            }
        }

        let current = self.current_contacts();
        let mut events = Vec::new();
        for (key, &(a, b)) in &current {
            if !self.touching.contains_key(key) {
                events.push(ContactEvent {
                    phase: ContactPhase::Begin,
                    a,
                    b,
                });
            }
        }
        for (key, &(a, b)) in &self.touching {
            if !current.contains_key(key) {
                events.push(ContactEvent {
                    phase: ContactPhase::End,
                    a,
                    b,
                });
            }
        }
        self.touching = current;
        events
    }

    fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }
}
