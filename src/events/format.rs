//! Compact text format for gameplay event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:00000|LS|Arena|2
//! T:00016|SC|E0|Idle|Attacking:Strike
//! T:00016|AC|E0|Strike
//! T:00016|DM|P|10.0|90.0
//! T:02400|DE|E1
//! ```

use super::types::{ActorId, GameEvent};
use crate::combat::{AttackKind, CombatState};

/// Serialize a GameEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &GameEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        GameEvent::LevelStart { level, enemies } => format!("{}|{}", level, enemies),
        GameEvent::StateChange { actor, from, to } => {
            format!("{}|{}|{}", actor, from.label(), to.label())
        }
        GameEvent::AttackCommit { actor, kind } => format!("{}|{}", actor, kind.name()),
        GameEvent::Damage {
            actor,
            amount,
            health,
        } => format!("{}|{:.1}|{:.1}", actor, amount, health),
        GameEvent::Death { actor } => actor.to_string(),
        GameEvent::Jump { actor } => actor.to_string(),
        GameEvent::Dodge { actor } => actor.to_string(),
    };

    format!("{}|{}|{}", ts, code, data)
}

/// Parse a line back into timestamp and event
pub fn parse_event(line: &str) -> Option<(u32, GameEvent)> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 3 {
        return None;
    }

    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u32 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "LS" if data.len() >= 2 => GameEvent::LevelStart {
            level: data[0].to_string(),
            enemies: data[1].parse().ok()?,
        },
        "SC" if data.len() >= 3 => GameEvent::StateChange {
            actor: parse_actor(data[0])?,
            from: CombatState::from_label(data[1])?,
            to: CombatState::from_label(data[2])?,
        },
        "AC" if data.len() >= 2 => GameEvent::AttackCommit {
            actor: parse_actor(data[0])?,
            kind: AttackKind::from_name(data[1])?,
        },
        "DM" if data.len() >= 3 => GameEvent::Damage {
            actor: parse_actor(data[0])?,
            amount: data[1].parse().ok()?,
            health: data[2].parse().ok()?,
        },
        "DE" if !data.is_empty() => GameEvent::Death {
            actor: parse_actor(data[0])?,
        },
        "J" if !data.is_empty() => GameEvent::Jump {
            actor: parse_actor(data[0])?,
        },
        "DG" if !data.is_empty() => GameEvent::Dodge {
            actor: parse_actor(data[0])?,
        },
        _ => return None,
    };

    Some((time_ms, event))
}

/// Events from a captured debug log. Each line may carry a logger prefix
/// before the `T:` field; lines without an event are skipped. Timestamps
/// that wrap past 99999 ms are unwrapped so the result stays monotonic.
pub fn parse_log(content: &str) -> Vec<(u32, GameEvent)> {
    let mut events = Vec::new();
    let mut offset = 0;
    let mut last = 0;
    for line in content.lines() {
        let Some(start) = line.find("T:") else {
            continue;
        };
        let Some((time_ms, event)) = parse_event(&line[start..]) else {
            continue;
        };
        if time_ms < last {
            offset += 100000;
        }
        last = time_ms;
        events.push((time_ms + offset, event));
    }
    events
}

fn parse_actor(s: &str) -> Option<ActorId> {
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ComboPhase;

    #[test]
    fn test_state_change_line() {
        let event = GameEvent::StateChange {
            actor: ActorId::Enemy(0),
            from: CombatState::Idle,
            to: CombatState::Attacking(AttackKind::Strike),
        };
        let line = serialize_event(16, &event);
        assert_eq!(line, "T:00016|SC|E0|Idle|Attacking:Strike");
        assert_eq!(parse_event(&line), Some((16, event)));
    }

    #[test]
    fn test_damage_line_parses_back() {
        let event = GameEvent::Damage {
            actor: ActorId::Player,
            amount: 25.0,
            health: 75.0,
        };
        let line = serialize_event(1500, &event);
        assert_eq!(line, "T:01500|DM|P|25.0|75.0");
        let (ts, parsed) = parse_event(&line).unwrap();
        assert_eq!(ts, 1500);
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_attack_commit_names_variant() {
        let event = GameEvent::AttackCommit {
            actor: ActorId::Player,
            kind: AttackKind::Light(ComboPhase::Second),
        };
        assert_eq!(serialize_event(0, &event), "T:00000|AC|P|Light2");
    }

    #[test]
    fn test_log_skips_noise_and_unwraps_time() {
        let log = "\
2026-10-14T10:00:00Z DEBUG nightpaw::world: T:00000|LS|Duel|1
2026-10-14T10:00:00Z  INFO nightpaw::session: level ready
2026-10-14T10:01:39Z DEBUG nightpaw::world: T:99984|AC|E0|Strike
2026-10-14T10:01:40Z DEBUG nightpaw::world: T:00016|DM|P|10.0|90.0
T:00032|DE|P
";
        let events = parse_log(log);
        let times: Vec<u32> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0, 99984, 100016, 100032]);
        assert_eq!(
            events[3].1,
            GameEvent::Death {
                actor: ActorId::Player
            }
        );
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert!(parse_event("").is_none());
        assert!(parse_event("T:00010|DE").is_none());
        assert!(parse_event("X:00010|DE|P").is_none());
        assert!(parse_event("T:00010|ZZ|P").is_none());
        assert!(parse_event("T:00010|SC|P|Idle|Flying").is_none());
    }
}
