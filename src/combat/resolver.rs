//! Strike-box resolution against the physics world

use std::collections::BTreeSet;

use bevy::prelude::Vec2;

use super::{AttackKind, AttackSpec, CombatMachine, Facing};
use crate::physics::{Aabb, BodyHandle, FixtureTag, PhysicsWorld};

/// Everything needed to resolve one committed attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackCommit {
    pub attacker: BodyHandle,
    pub kind: AttackKind,
    pub attack: AttackSpec,
    pub origin: Vec2,
    pub facing: Facing,
    /// Attacker body half extents; the box is as tall as the body
    pub half_extents: Vec2,
}

impl AttackCommit {
    /// Commit for the attack the machine is currently in, if any
    pub fn from_machine(
        machine: &CombatMachine,
        attacker: BodyHandle,
        origin: Vec2,
    ) -> Option<Self> {
        let kind = machine.state().attack()?;
        let attack = *machine.capabilities().attack(kind)?;
        Some(Self {
            attacker,
            kind,
            attack,
            origin,
            facing: machine.facing(),
            half_extents: machine.capabilities().half_extents,
        })
    }
}

/// Box centered `range` ahead of the attacker, `range` wide
pub fn strike_box(commit: &AttackCommit) -> Aabb {
    let range = commit.attack.range;
    let center = Vec2::new(
        commit.origin.x + commit.facing.sign() * range,
        commit.origin.y,
    );
    Aabb::from_center(center, Vec2::new(range * 0.5, commit.half_extents.y))
}

/// Distinct bodies tagged `target` inside the strike box. Each appears once
/// however many fixtures it has in the box.
pub fn resolve_strike(
    physics: &dyn PhysicsWorld,
    commit: &AttackCommit,
    target: FixtureTag,
) -> Vec<BodyHandle> {
    let hits: BTreeSet<BodyHandle> = physics
        .query_aabb(strike_box(commit))
        .into_iter()
        .filter(|f| f.tag == target && f.body != commit.attacker)
        .map(|f| f.body)
        .collect();
    hits.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ArenaPhysics, BodyDef};

    fn heavy_commit(attacker: BodyHandle, origin: Vec2, facing: Facing) -> AttackCommit {
        AttackCommit {
            attacker,
            kind: AttackKind::Heavy,
            attack: AttackSpec {
                duration: 0.25,
                range: 1.0,
                damage: 25.0,
            },
            origin,
            facing,
            half_extents: Vec2::splat(0.25),
        }
    }

    #[test]
    fn test_commit_from_attacking_machine() {
        use crate::combat::{Capabilities, CombatAction, Motion};
        use crate::tuning::CombatTuning;

        let mut machine = CombatMachine::new(Capabilities::player(&CombatTuning::default()));
        let mut motion = Motion::new(Vec2::ZERO);
        assert!(AttackCommit::from_machine(&machine, BodyHandle(1), Vec2::ZERO).is_none());

        machine.begin_ground_contact();
        assert!(machine.apply(CombatAction::HeavyAttack, &mut motion));
        let commit = AttackCommit::from_machine(&machine, BodyHandle(1), Vec2::new(2.0, 1.25));
        let commit = commit.expect("heavy commit");
        assert_eq!(commit.kind, AttackKind::Heavy);
        assert_eq!(commit.attack.damage, 25.0);
        assert_eq!(commit.facing, Facing::Right);
    }

    #[test]
    fn test_strike_box_faces_direction() {
        let commit = heavy_commit(BodyHandle(0), Vec2::new(2.0, 1.25), Facing::Right);
        let area = strike_box(&commit);
        assert_eq!(area.min, Vec2::new(2.5, 1.0));
        assert_eq!(area.max, Vec2::new(3.5, 1.5));

        let commit = heavy_commit(BodyHandle(0), Vec2::new(2.0, 1.25), Facing::Left);
        let area = strike_box(&commit);
        assert_eq!(area.min.x, 0.5);
        assert_eq!(area.max.x, 1.5);
    }

    #[test]
    fn test_hits_only_opposing_faction_once() {
        let mut world = ArenaPhysics::new(Vec2::ZERO);
        let player = world.create_body(BodyDef::dynamic_box(
            Vec2::new(2.0, 1.25),
            Vec2::splat(0.25),
            FixtureTag::Player,
        ));
        let enemy = world.create_body(BodyDef::dynamic_box(
            Vec2::new(2.8, 1.25),
            Vec2::splat(0.25),
            FixtureTag::Enemy,
        ));
        // Platform inside the box must be ignored
        world.create_body(BodyDef::static_box(Vec2::new(3.0, 1.0), Vec2::new(1.0, 0.1)));
        // Enemy behind the player is out of the box
        world.create_body(BodyDef::dynamic_box(
            Vec2::new(1.2, 1.25),
            Vec2::splat(0.25),
            FixtureTag::Enemy,
        ));

        let commit = heavy_commit(player, Vec2::new(2.0, 1.25), Facing::Right);
        assert_eq!(resolve_strike(&world, &commit, FixtureTag::Enemy), vec![enemy]);
    }

    /// A world whose bodies report several fixtures each
    struct MultiFixtureWorld {
        inner: ArenaPhysics,
    }

    impl PhysicsWorld for MultiFixtureWorld {
        fn create_body(&mut self, def: BodyDef) -> BodyHandle {
            self.inner.create_body(def)
        }
        fn destroy_body(&mut self, body: BodyHandle) {
            self.inner.destroy_body(body)
        }
        fn set_active(&mut self, body: BodyHandle, active: bool) {
            self.inner.set_active(body, active)
        }
        fn is_active(&self, body: BodyHandle) -> bool {
            self.inner.is_active(body)
        }
        fn position(&self, body: BodyHandle) -> Vec2 {
            self.inner.position(body)
        }
        fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
            self.inner.linear_velocity(body)
        }
        fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
            self.inner.set_linear_velocity(body, velocity)
        }
        fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
            self.inner.apply_linear_impulse(body, impulse)
        }
        fn query_aabb(&self, area: Aabb) -> Vec<crate::physics::Fixture> {
            let hits = self.inner.query_aabb(area);
            hits.iter().chain(hits.iter()).copied().collect()
        }
        fn step(&mut self, dt: f32) -> Vec<crate::physics::ContactEvent> {
            self.inner.step(dt)
        }
        fn body_count(&self) -> usize {
            self.inner.body_count()
        }
    }

    #[test]
    fn test_duplicate_fixtures_deduplicated() {
        let mut world = MultiFixtureWorld {
            inner: ArenaPhysics::new(Vec2::ZERO),
        };
        let player = world.create_body(BodyDef::dynamic_box(
            Vec2::new(2.0, 1.25),
            Vec2::splat(0.25),
            FixtureTag::Player,
        ));
        let enemy = world.create_body(BodyDef::dynamic_box(
            Vec2::new(3.0, 1.25),
            Vec2::splat(0.25),
            FixtureTag::Enemy,
        ));
        let commit = heavy_commit(player, Vec2::new(2.0, 1.25), Facing::Right);
        assert_eq!(world.query_aabb(strike_box(&commit)).len(), 2);
        assert_eq!(resolve_strike(&world, &commit, FixtureTag::Enemy), vec![enemy]);
    }
}
