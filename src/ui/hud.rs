//! HUD health bar: a render-only observer of player health

use bevy::prelude::*;

use crate::constants::*;
use crate::world::ActiveSession;

/// Health bar geometry and the last health it was told about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    /// Bottom-left corner in world units
    pub position: Vec2,
    pub size: Vec2,
    health: f32,
    max_health: f32,
}

impl HealthBar {
    pub fn new(position: Vec2, size: Vec2, max_health: f32) -> Self {
        Self {
            position,
            size,
            health: max_health,
            max_health,
        }
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// Filled share of the bar in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn fill_size(&self) -> Vec2 {
        Vec2::new(self.size.x * self.fraction(), self.size.y)
    }
}

impl Default for HealthBar {
    fn default() -> Self {
        Self::new(HEALTH_BAR_POSITION, HEALTH_BAR_SIZE, PLAYER_MAX_HEALTH)
    }
}

/// Green fill node inside the health bar background
#[derive(Component)]
pub struct HealthBarFill;

/// Spawn the health bar, placed from its world-unit geometry
pub fn spawn_health_bar(mut commands: Commands, session: Res<ActiveSession>) {
    let bar = session.0.player().health_bar();
    let top = VIEWPORT_HEIGHT - bar.position.y - bar.size.y;
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(bar.position.x * PIXELS_PER_UNIT),
                top: Val::Px(top * PIXELS_PER_UNIT),
                width: Val::Px(bar.size.x * PIXELS_PER_UNIT),
                height: Val::Px(bar.size.y * PIXELS_PER_UNIT),
                ..default()
            },
            BackgroundColor(HEALTH_BAR_BACK_COLOR),
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(HEALTH_BAR_FILL_COLOR),
                HealthBarFill,
            ));
        });
}

/// Resize the fill to the player's health
pub fn update_health_bar(
    session: Res<ActiveSession>,
    mut fill_query: Query<&mut Node, With<HealthBarFill>>,
) {
    let fraction = session.0.player().health_bar().fraction();
    for mut node in &mut fill_query {
        node.width = Val::Percent(fraction * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_tracks_health() {
        let mut bar = HealthBar::default();
        assert_eq!(bar.fill_size(), Vec2::new(1.0, 0.4));
        bar.set_health(25.0);
        assert_eq!(bar.fraction(), 0.25);
        assert_eq!(bar.fill_size().x, 0.25);
        bar.set_health(-10.0);
        assert_eq!(bar.health(), 0.0);
    }

    #[test]
    fn test_parameterized_maximum() {
        let mut bar = HealthBar::new(Vec2::ZERO, Vec2::new(2.0, 0.2), 50.0);
        bar.set_health(25.0);
        assert_eq!(bar.fill_size(), Vec2::new(1.0, 0.2));
        bar.set_health(80.0);
        assert_eq!(bar.health(), 50.0);
    }
}
