//! Utility functions for nightpaw

use bevy::prelude::*;

/// Collapse an analog axis to -1, 0 or 1 with a deadzone
pub fn axis_direction(value: f32, deadzone: f32) -> f32 {
    if value > deadzone {
        1.0
    } else if value < -deadzone {
        -1.0
    } else {
        0.0
    }
}

/// Round to the nearest integer, halves toward +inf
pub fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Truncate a world position to its grid cell (toward zero)
pub fn truncate_cell(pos: Vec2) -> IVec2 {
    IVec2::new(pos.x as i32, pos.y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_direction_deadzone() {
        assert_eq!(axis_direction(0.2, 0.25), 0.0);
        assert_eq!(axis_direction(-0.2, 0.25), 0.0);
        assert_eq!(axis_direction(0.9, 0.25), 1.0);
        assert_eq!(axis_direction(-1.0, 0.25), -1.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(1.15), 1);
        assert_eq!(round_half_up(-0.5), 0);
    }

    #[test]
    fn test_truncate_cell() {
        assert_eq!(truncate_cell(Vec2::new(2.99, 1.245)), IVec2::new(2, 1));
        assert_eq!(truncate_cell(Vec2::new(-0.4, 0.7)), IVec2::new(0, 0));
    }
}
