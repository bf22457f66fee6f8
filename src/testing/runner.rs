//! Scenario execution engine: a headless session stepped at 60 Hz

use crate::constants::*;
use crate::levels::LevelDatabase;
use crate::session::GameSession;
use crate::tuning::CombatTuning;

use super::assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
use super::input::ScriptedInputs;
use super::parser::TestDefinition;

/// Frames to run when a scenario names none
const DEFAULT_FRAMES: u32 = 60;

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u32 },
    Fail { error: AssertionError },
    Error { message: String },
}

/// Run a scenario against the levels in `config/levels.txt`
pub fn run_test(test: &TestDefinition) -> TestResult {
    let level_db = LevelDatabase::load_from_file(LEVELS_FILE);
    run_test_with(test, &level_db)
}

/// Run a scenario against an explicit level database
pub fn run_test_with(test: &TestDefinition, level_db: &LevelDatabase) -> TestResult {
    let Some(level) = level_db.find(&test.setup.level) else {
        return TestResult::Error {
            message: format!(
                "Level '{}' not found. Available: {:?}",
                test.setup.level,
                level_db.levels.iter().map(|l| &l.name).collect::<Vec<_>>()
            ),
        };
    };

    let mut level = level.clone();
    if let Some([x, y]) = test.setup.player {
        level.player_spawn = bevy::math::Vec2::new(x, y);
    }
    if let Some(enemies) = &test.setup.enemies {
        level.enemy_spawns = enemies
            .iter()
            .map(|[x, y]| bevy::math::Vec2::new(*x, *y))
            .collect();
    }

    let tuning = CombatTuning::default();
    let mut session = GameSession::from_level(&level, &tuning);
    if let Some(health) = test.setup.player_health {
        session.set_player_health(health);
    }

    let mut captured: Vec<CapturedEvent> = session
        .bus_mut()
        .drain()
        .iter()
        .map(|e| CapturedEvent::from_game_event(0, &e.event))
        .collect();

    let mut state_checks = test.expect.state.clone();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;

    let mut inputs = ScriptedInputs::from_inputs(&test.input);
    let last_frame = match test.last_frame() {
        0 => DEFAULT_FRAMES,
        n => n,
    };

    // Checks at frame 0 see the freshly built session
    while next_check < state_checks.len() && state_checks[next_check].after_frame == 0 {
        if let Err(error) = check_state(&state_checks[next_check], &WorldState::capture(&session)) {
            return TestResult::Fail { error };
        }
        next_check += 1;
    }

    for frame in 1..=last_frame {
        let commands = inputs.commands_for(frame);
        let events = session.tick(FIXED_TIMESTEP, &commands);
        captured.extend(events.iter().map(|e| CapturedEvent::from_game_event(frame, e)));
        session.bus_mut().drain();

        while next_check < state_checks.len() && state_checks[next_check].after_frame == frame {
            let world = WorldState::capture(&session);
            if let Err(error) = check_state(&state_checks[next_check], &world) {
                return TestResult::Fail {
                    error: AssertionError {
                        message: format!("After frame {}: {}", frame, error.message),
                        ..error
                    },
                };
            }
            next_check += 1;
        }
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass { frames: last_frame }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parser::parse_test;

    fn run_bundled(name: &str, content: &str) {
        let def = match parse_test(content) {
            Ok(def) => def,
            Err(e) => panic!("{}: {}", name, e),
        };
        match run_test_with(&def, &LevelDatabase::default_levels()) {
            TestResult::Pass { .. } => {}
            TestResult::Fail { error } => panic!("{} failed: {}", name, error),
            TestResult::Error { message } => panic!("{} errored: {}", name, message),
        }
    }

    #[test]
    fn test_bundled_scenarios_pass() {
        let scenarios = [
            (
                "enemy_strike",
                include_str!("../../tests/scenarios/enemy/enemy_strike.toml"),
            ),
            (
                "unreachable_enemy",
                include_str!("../../tests/scenarios/enemy/unreachable_enemy.toml"),
            ),
            (
                "light_combo",
                include_str!("../../tests/scenarios/combat/light_combo.toml"),
            ),
            (
                "combo_reset",
                include_str!("../../tests/scenarios/combat/combo_reset.toml"),
            ),
            (
                "heavy_kill",
                include_str!("../../tests/scenarios/combat/heavy_kill.toml"),
            ),
            (
                "dodge_cooldown",
                include_str!("../../tests/scenarios/movement/dodge_cooldown.toml"),
            ),
            ("jump", include_str!("../../tests/scenarios/movement/jump.toml")),
            (
                "invincibility",
                include_str!("../../tests/scenarios/health/invincibility.toml"),
            ),
            (
                "low_health_death",
                include_str!("../../tests/scenarios/health/low_health_death.toml"),
            ),
        ];
        for (name, content) in scenarios {
            run_bundled(name, content);
        }
    }

    #[test]
    fn test_unknown_level_is_error() {
        let def = parse_test("name = \"x\"\n[setup]\nlevel = \"Moon\"\n").unwrap();
        let result = run_test_with(&def, &LevelDatabase::default_levels());
        assert!(matches!(result, TestResult::Error { .. }));
    }

    #[test]
    fn test_failing_check_reports_frame() {
        let def = parse_test(
            "name = \"x\"\n[setup]\nlevel = \"Training\"\n\
             [[expect.state]]\nafter_frame = 3\nchecks = [\"player.health == 5\"]\n",
        )
        .unwrap();
        match run_test_with(&def, &LevelDatabase::default_levels()) {
            TestResult::Fail { error } => assert!(error.message.starts_with("After frame 3")),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
