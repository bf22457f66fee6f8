//! Contact routing: physics contact events to per-body handler functions

use super::{BodyHandle, ContactEvent, ContactPhase};
use crate::combat::CombatMachine;
use crate::events::ActorId;

/// Plain function invoked when a routed body starts or stops touching something
pub type ContactHandler = fn(&mut CombatMachine, ContactPhase);

/// Any contact counts as ground: begin lands, end lifts off
pub fn ground_contact(machine: &mut CombatMachine, phase: ContactPhase) {
    match phase {
        ContactPhase::Begin => machine.begin_ground_contact(),
        ContactPhase::End => machine.end_ground_contact(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Route {
    body: BodyHandle,
    actor: ActorId,
    handler: ContactHandler,
}

#[derive(Debug, Clone, Default)]
pub struct ContactRouter {
    routes: Vec<Route>,
}

impl ContactRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route contacts involving `body` to `handler` on `actor`'s machine
    pub fn register(&mut self, body: BodyHandle, actor: ActorId, handler: ContactHandler) {
        self.unregister(body);
        self.routes.push(Route {
            body,
            actor,
            handler,
        });
    }

    pub fn unregister(&mut self, body: BodyHandle) {
        self.routes.retain(|r| r.body != body);
    }

    /// Handlers to run for one event, in registration order
    pub fn dispatch(&self, event: &ContactEvent) -> Vec<(ActorId, ContactPhase, ContactHandler)> {
        self.routes
            .iter()
            .filter(|r| event.involves(r.body))
            .map(|r| (r.actor, event.phase, r.handler))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Capabilities;
    use crate::physics::{Fixture, FixtureTag};
    use crate::tuning::CombatTuning;

    fn event(phase: ContactPhase, a: u32, b: u32) -> ContactEvent {
        ContactEvent {
            phase,
            a: Fixture {
                body: BodyHandle(a),
                tag: FixtureTag::Platform,
            },
            b: Fixture {
                body: BodyHandle(b),
                tag: FixtureTag::Player,
            },
        }
    }

    #[test]
    fn test_dispatch_matches_either_side() {
        let mut router = ContactRouter::new();
        router.register(BodyHandle(3), ActorId::Player, ground_contact);
        assert_eq!(router.dispatch(&event(ContactPhase::Begin, 0, 3)).len(), 1);
        assert_eq!(router.dispatch(&event(ContactPhase::Begin, 3, 0)).len(), 1);
        assert!(router.dispatch(&event(ContactPhase::Begin, 0, 1)).is_empty());
    }

    #[test]
    fn test_handler_drives_grounded_flag() {
        let mut router = ContactRouter::new();
        router.register(BodyHandle(1), ActorId::Player, ground_contact);
        let mut machine = CombatMachine::new(Capabilities::player(&CombatTuning::default()));

        for (actor, phase, handler) in router.dispatch(&event(ContactPhase::Begin, 0, 1)) {
            assert_eq!(actor, ActorId::Player);
            handler(&mut machine, phase);
        }
        assert!(machine.is_grounded());
        assert!(!machine.is_airborne());

        for (_, phase, handler) in router.dispatch(&event(ContactPhase::End, 0, 1)) {
            handler(&mut machine, phase);
        }
        assert!(machine.is_airborne());
    }

    #[test]
    fn test_reregister_replaces_route() {
        let mut router = ContactRouter::new();
        router.register(BodyHandle(1), ActorId::Player, ground_contact);
        router.register(BodyHandle(1), ActorId::Enemy(0), ground_contact);
        assert_eq!(router.len(), 1);
        router.unregister(BodyHandle(1));
        assert!(router.is_empty());
    }
}
