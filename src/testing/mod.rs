//! Scenario testing system for deterministic combat checks
//!
//! Scenarios script player commands per frame against a headless
//! `GameSession` and assert on the event sequence and actor state.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, check_sequence, check_state};
pub use input::ScriptedInputs;
pub use parser::{
    ExpectedEvent, FrameInput, StateAssertion, TestDefinition, TestExpectations, TestSetup,
};
pub use runner::{TestResult, run_test, run_test_with};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
