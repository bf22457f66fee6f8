//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Level and spawn configuration
#[derive(Debug, Deserialize)]
pub struct TestSetup {
    /// Level name or index in the level database
    pub level: String,
    /// Player spawn override `[x, y]`
    pub player: Option<[f32; 2]>,
    /// Enemy spawn overrides; replaces the level's list when present
    pub enemies: Option<Vec<[f32; 2]>>,
    pub player_health: Option<f32>,
}

/// Player commands starting at a specific frame
///
/// `move` sets the held axis from this frame on; with `hold` it only
/// lasts that many frames. Presses fire on this frame only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub frame: u32,
    #[serde(rename = "move")]
    pub move_x: Option<f32>,
    pub hold: Option<u32>,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub light: bool,
    #[serde(default)]
    pub heavy: bool,
    #[serde(default)]
    pub dodge: bool,
    #[serde(default)]
    pub self_damage: bool,
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// State assertions at different frames (`[[expect.state]]`)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event, matched in order
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// `player`, `enemy0`, or the log form `P` / `E0`
    pub actor: Option<String>,
    /// Attack name (`Light1`) or entered state (`Hurt`, `Attacking:Heavy`)
    pub detail: Option<String>,
    pub frame_min: Option<u32>,
    pub frame_max: Option<u32>,
}

/// State checks run after a frame
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u32,
    #[serde(default)]
    pub checks: Vec<String>,
}

impl TestDefinition {
    /// Last frame anything refers to
    pub fn last_frame(&self) -> u32 {
        let inputs = self
            .input
            .iter()
            .map(|i| i.frame + i.hold.unwrap_or(0));
        let checks = self.expect.state.iter().map(|s| s.after_frame);
        let events = self.expect.sequence.iter().filter_map(|e| e.frame_max);
        inputs.chain(checks).chain(events).max().unwrap_or(0)
    }
}

/// Parse scenario text
pub fn parse_test(content: &str) -> Result<TestDefinition, String> {
    toml::from_str(content).map_err(|e| format!("Invalid scenario: {}", e))
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
