//! Follow-the-player decision, re-planned every frame

use bevy::prelude::*;

use crate::ai::grid::WalkabilityGrid;
use crate::ai::pathfinding::find_path;
use crate::helpers::truncate_cell;

/// What an enemy should do this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitDecision {
    /// Walk toward the next path cell; `leap` when it is higher up
    Advance { direction: f32, leap: bool, next: IVec2 },
    /// Close enough to strike
    Engage { distance: f32 },
    /// No usable path and out of reach
    Hold,
}

/// Plan from the enemy cell to the player cell (both truncated), then
/// decide between walking, striking and waiting.
pub fn follow_player(
    grid: &WalkabilityGrid,
    enemy_pos: Vec2,
    player_pos: Vec2,
    attack_range: f32,
) -> PursuitDecision {
    let start = truncate_cell(enemy_pos);
    let goal = truncate_cell(player_pos);
    let path = find_path(grid, start, goal);

    if let Some(next) = path.next_step() {
        let direction = (next.x - start.x).signum() as f32;
        debug!(
            "pursuit {:?} -> {:?}: {} cells, next {:?}",
            start,
            goal,
            path.len(),
            next
        );
        return PursuitDecision::Advance {
            direction,
            leap: next.y > start.y,
            next,
        };
    }

    let distance = enemy_pos.distance(player_pos);
    if distance <= attack_range {
        PursuitDecision::Engage { distance }
    } else {
        PursuitDecision::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_and_ledge() -> WalkabilityGrid {
        let mut anchors: Vec<Vec2> = (0..=7).map(|x| Vec2::new(x as f32, 1.0)).collect();
        anchors.extend((5..=7).map(|x| Vec2::new(x as f32, 2.15)));
        WalkabilityGrid::build(8, 5, &anchors)
    }

    #[test]
    fn test_advance_toward_player() {
        let grid = floor_and_ledge();
        let decision = follow_player(&grid, Vec2::new(5.5, 1.245), Vec2::new(1.5, 1.245), 1.0);
        assert_eq!(
            decision,
            PursuitDecision::Advance {
                direction: -1.0,
                leap: false,
                next: IVec2::new(4, 1),
            }
        );
    }

    #[test]
    fn test_engage_when_sharing_cell_in_range() {
        let grid = floor_and_ledge();
        let decision = follow_player(&grid, Vec2::new(2.8, 1.245), Vec2::new(2.1, 1.245), 1.0);
        assert!(matches!(decision, PursuitDecision::Engage { distance } if (distance - 0.7).abs() < 1e-4));
    }

    #[test]
    fn test_disconnected_platform_holds() {
        let grid = floor_and_ledge();
        // Enemy on the ledge, player on the floor far away
        let decision = follow_player(&grid, Vec2::new(6.0, 2.395), Vec2::new(1.0, 1.245), 1.0);
        assert_eq!(decision, PursuitDecision::Hold);
    }

    #[test]
    fn test_unreachable_but_close_still_engages() {
        let grid = floor_and_ledge();
        // Ledge edge above the floor: no path, but inside strike range
        let decision = follow_player(&grid, Vec2::new(5.2, 2.395), Vec2::new(4.6, 1.745), 1.0);
        assert!(matches!(decision, PursuitDecision::Engage { .. }));
    }
}
