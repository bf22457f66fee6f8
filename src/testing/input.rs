//! Scripted input injection for scenarios

use std::collections::HashMap;

use super::parser::FrameInput;
use crate::input::PlayerCommands;

/// Per-frame player commands built from the scenario's `[[input]]` list
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    /// Map of frame -> inputs starting that frame
    frames: HashMap<u32, Vec<FrameInput>>,
    /// Held axis (persists between frames)
    move_x: f32,
    /// Frame after which the held axis drops back to zero
    release_after: Option<u32>,
}

impl ScriptedInputs {
    pub fn from_inputs(inputs: &[FrameInput]) -> Self {
        let mut frames: HashMap<u32, Vec<FrameInput>> = HashMap::new();
        for input in inputs {
            frames.entry(input.frame).or_default().push(input.clone());
        }
        Self {
            frames,
            ..Default::default()
        }
    }

    /// Commands for `frame`. Call once per frame, in order.
    pub fn commands_for(&mut self, frame: u32) -> PlayerCommands {
        if let Some(release) = self.release_after {
            if frame > release {
                self.move_x = 0.0;
                self.release_after = None;
            }
        }

        let mut commands = PlayerCommands::default();
        if let Some(inputs) = self.frames.get(&frame) {
            for input in inputs {
                if let Some(axis) = input.move_x {
                    self.move_x = axis.clamp(-1.0, 1.0);
                    self.release_after = input.hold.map(|h| frame + h.saturating_sub(1));
                }
                commands.jump |= input.jump;
                commands.light_attack |= input.light;
                commands.heavy_attack |= input.heavy;
                commands.dodge |= input.dodge;
                commands.self_damage |= input.self_damage;
            }
        }
        commands.move_x = self.move_x;
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presses_fire_once_axis_persists() {
        let inputs = vec![FrameInput {
            frame: 2,
            move_x: Some(1.0),
            light: true,
            ..Default::default()
        }];
        let mut scripted = ScriptedInputs::from_inputs(&inputs);
        assert_eq!(scripted.commands_for(1), PlayerCommands::default());
        let second = scripted.commands_for(2);
        assert!(second.light_attack);
        assert_eq!(second.move_x, 1.0);
        let third = scripted.commands_for(3);
        assert!(!third.light_attack);
        assert_eq!(third.move_x, 1.0);
    }

    #[test]
    fn test_hold_releases_axis() {
        let inputs = vec![FrameInput {
            frame: 1,
            move_x: Some(-1.0),
            hold: Some(2),
            ..Default::default()
        }];
        let mut scripted = ScriptedInputs::from_inputs(&inputs);
        assert_eq!(scripted.commands_for(1).move_x, -1.0);
        assert_eq!(scripted.commands_for(2).move_x, -1.0);
        assert_eq!(scripted.commands_for(3).move_x, 0.0);
    }
}
