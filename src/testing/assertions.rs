//! Assertion checking for scenario expectations

use std::collections::HashMap;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::combat::{CombatMachine, CombatState, Facing};
use crate::events::{ActorId, GameEvent};
use crate::session::GameSession;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n    Expected: {}\n    Actual: {}",
            self.message, self.expected, self.actual
        )
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u32,
    pub event_type: String,
    pub actor: Option<ActorId>,
    pub detail: Option<String>,
}

impl CapturedEvent {
    pub fn from_game_event(frame: u32, event: &GameEvent) -> Self {
        Self {
            frame,
            event_type: event.name().to_string(),
            actor: event.actor(),
            detail: event.detail(),
        }
    }
}

/// Actor name as used in scenarios: `player`/`enemyN`, or the log form `P`/`EN`
pub fn parse_actor(name: &str) -> Option<ActorId> {
    if name == "player" {
        return Some(ActorId::Player);
    }
    if let Some(index) = name.strip_prefix("enemy") {
        return index.parse().ok().map(ActorId::Enemy);
    }
    name.parse().ok()
}

/// Scenario key for an actor
pub fn actor_key(actor: ActorId) -> String {
    match actor {
        ActorId::Player => "player".to_string(),
        ActorId::Enemy(index) => format!("enemy{}", index),
    }
}

/// `Attacking` matches `Attacking:Heavy`; anything else must be exact
fn detail_matches(expected: &str, actual: Option<&str>) -> bool {
    match actual {
        Some(actual) => actual == expected || actual.starts_with(&format!("{}:", expected)),
        None => false,
    }
}

/// Check that captured events contain the expected ones in order
pub fn check_sequence(
    expected: &[ExpectedEvent],
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let exp_actor = match &exp.actor {
            Some(name) => Some(parse_actor(name).ok_or_else(|| AssertionError {
                message: format!("Event #{} has an unknown actor", i + 1),
                expected: "player, enemyN, P or EN".to_string(),
                actual: name.clone(),
            })?),
            None => None,
        };

        // Find matching event starting from current position
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            if cap.event_type != exp.event {
                return false;
            }
            if exp_actor.is_some() && cap.actor != exp_actor {
                return false;
            }
            if let Some(ref detail) = exp.detail {
                if !detail_matches(detail, cap.detail.as_deref()) {
                    return false;
                }
            }
            true
        });

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.frame_min {
                    if cap.frame < min {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                            expected: format!("frame >= {}", min),
                            actual: format!("frame {}", cap.frame),
                        });
                    }
                }
                if let Some(max) = exp.frame_max {
                    if cap.frame > max {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                            expected: format!("frame <= {}", max),
                            actual: format!("frame {}", cap.frame),
                        });
                    }
                }
                captured_idx += offset + 1;
            }
            None => {
                let actor_str = exp
                    .actor
                    .as_ref()
                    .map(|a| format!(" (actor: {})", a))
                    .unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, actor_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..]
                            .iter()
                            .map(|e| &e.event_type)
                            .collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// One actor as seen by state checks
#[derive(Debug, Clone)]
pub struct ActorSnapshot {
    pub state: CombatState,
    pub health: f32,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub grounded: bool,
    pub combo: u8,
    pub invincible: bool,
}

impl ActorSnapshot {
    fn capture(machine: &CombatMachine, x: f32, y: f32) -> Self {
        Self {
            state: machine.state(),
            health: machine.health(),
            x,
            y,
            facing: machine.facing(),
            grounded: machine.is_grounded(),
            combo: machine.combo(),
            invincible: machine.is_invincible(),
        }
    }
}

/// Session state for assertions, keyed `player`, `enemy0`, ...
pub struct WorldState {
    pub actors: HashMap<String, ActorSnapshot>,
    pub enemies_alive: usize,
}

impl WorldState {
    pub fn capture(session: &GameSession) -> Self {
        let mut actors = HashMap::new();
        for actor in session.actors() {
            if let (Some(machine), Some(pos)) = (session.machine(actor), session.position(actor)) {
                actors.insert(actor_key(actor), ActorSnapshot::capture(machine, pos.x, pos.y));
            }
        }
        Self {
            actors,
            enemies_alive: session.enemies_alive(),
        }
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Two-character operators first
    for op in &["==", "!=", ">=", "<=", ">", "<", "="] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, *op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'actor.property == value' or 'actor.property > value'".to_string(),
            actual: check.clone(),
        })?;

        let path_parts: Vec<&str> = path.split('.').collect();

        if path_parts[0] == "enemies" {
            match path_parts.get(1) {
                Some(&"alive") => check_float_comparison(
                    path,
                    state.enemies_alive as f32,
                    operator,
                    expected_value,
                )?,
                _ => return Err(unknown_property(path)),
            }
            continue;
        }

        let actor_key = path_parts[0];
        let actor = state.actors.get(actor_key).ok_or_else(|| AssertionError {
            message: format!("Actor '{}' not found", actor_key),
            expected: format!("actor '{}'", actor_key),
            actual: format!("available: {:?}", state.actors.keys().collect::<Vec<_>>()),
        })?;

        match path_parts.get(1) {
            Some(&"health") => check_float_comparison(path, actor.health, operator, expected_value)?,
            Some(&"x") => check_float_comparison(path, actor.x, operator, expected_value)?,
            Some(&"y") => check_float_comparison(path, actor.y, operator, expected_value)?,
            Some(&"combo") => {
                check_float_comparison(path, actor.combo as f32, operator, expected_value)?
            }
            Some(&"state") => {
                let name = actor.state.name();
                let label = actor.state.label();
                let expected = expected_value.trim_matches('"');
                check_text(check, &[name, label.as_str()], operator, expected)?
            }
            Some(&"attack") => {
                let attack = actor.state.attack().map(|k| k.name()).unwrap_or("None");
                check_text(check, &[attack], operator, expected_value.trim_matches('"'))?
            }
            Some(&"facing") => {
                let facing = match actor.facing {
                    Facing::Left => "Left",
                    Facing::Right => "Right",
                };
                check_text(check, &[facing], operator, expected_value.trim_matches('"'))?
            }
            Some(&"grounded") => check_bool(check, actor.grounded, operator, expected_value)?,
            Some(&"invincible") => check_bool(check, actor.invincible, operator, expected_value)?,
            _ => return Err(unknown_property(path)),
        }
    }

    Ok(())
}

fn unknown_property(path: &str) -> AssertionError {
    AssertionError {
        message: format!("Unknown property '{}'", path),
        expected: "state, attack, health, x, y, facing, grounded, combo, invincible".to_string(),
        actual: path.to_string(),
    }
}

/// Equality against any of the accepted spellings
fn check_text(
    check: &str,
    actual: &[&str],
    operator: &str,
    expected: &str,
) -> Result<(), AssertionError> {
    let matches = actual.contains(&expected);
    let pass = match operator {
        "==" | "=" => matches,
        "!=" => !matches,
        _ => {
            return Err(AssertionError {
                message: format!("Operator '{}' not supported for text: {}", operator, check),
                expected: "== or !=".to_string(),
                actual: operator.to_string(),
            });
        }
    };
    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {}", check),
            expected: format!("{} {}", operator, expected),
            actual: actual.last().copied().unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

fn check_bool(
    check: &str,
    actual: bool,
    operator: &str,
    expected_str: &str,
) -> Result<(), AssertionError> {
    let actual = if actual { "true" } else { "false" };
    check_text(check, &[actual], operator, expected_str)
}

/// Check float comparison with operator
fn check_float_comparison(
    path: &str,
    actual: f32,
    operator: &str,
    expected_str: &str,
) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" | "==" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!(
                "Check failed: {} {} {} (actual: {:.2})",
                path, operator, expected_str, actual
            ),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}
