//! Input module - PlayerCommands resource and capture_input system

use bevy::prelude::*;

use crate::constants::*;

/// Buffered commands for the player. Presses accumulate in `Update` until
/// the next fixed step consumes them.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerCommands {
    pub move_x: f32,
    pub jump: bool,
    pub light_attack: bool,
    pub heavy_attack: bool,
    pub dodge: bool,
    /// Debug key: hurt yourself
    pub self_damage: bool,
}

impl PlayerCommands {
    /// Copy for this step and clear the one-shot presses
    pub fn take_presses(&mut self) -> PlayerCommands {
        let taken = *self;
        self.jump = false;
        self.light_attack = false;
        self.heavy_attack = false;
        self.dodge = false;
        self.self_damage = false;
        taken
    }
}

/// Runs in Update to capture input state before it's cleared.
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<PlayerCommands>,
) {
    // Horizontal movement (continuous - overwrite each frame)
    let mut move_x = 0.0;

    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        move_x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        move_x += 1.0;
    }

    for gamepad in &gamepads {
        if let Some(stick_x) = gamepad.get(GamepadAxis::LeftStickX) {
            if stick_x.abs() > STICK_DEADZONE {
                move_x += stick_x;
            }
        }
    }

    input.move_x = move_x.clamp(-1.0, 1.0);

    // One-shot presses accumulate until consumed
    let pressed = |keys: &[KeyCode], button: GamepadButton| {
        keys.iter().any(|k| keyboard.just_pressed(*k))
            || gamepads.iter().any(|gp| gp.just_pressed(button))
    };

    if pressed(&[KeyCode::KeyW, KeyCode::ArrowUp], GamepadButton::South) {
        input.jump = true;
    }
    if pressed(&[KeyCode::KeyR], GamepadButton::West) {
        input.light_attack = true;
    }
    if pressed(&[KeyCode::KeyE], GamepadButton::North) {
        input.heavy_attack = true;
    }
    if pressed(&[KeyCode::ShiftLeft], GamepadButton::RightTrigger) {
        input.dodge = true;
    }
    if keyboard.just_pressed(KeyCode::KeyH) {
        input.self_damage = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_presses_keeps_movement() {
        let mut input = PlayerCommands {
            move_x: -1.0,
            jump: true,
            light_attack: true,
            dodge: true,
            ..Default::default()
        };
        let taken = input.take_presses();
        assert!(taken.jump && taken.light_attack && taken.dodge);
        assert_eq!(input.move_x, -1.0);
        assert!(!input.jump && !input.light_attack && !input.dodge);
    }
}
