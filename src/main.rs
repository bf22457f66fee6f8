//! Nightpaw - a 2D action platformer built with Bevy
//!
//! Main entry point: app setup and system registration.

use bevy::prelude::*;
use nightpaw::{
    ActiveSession, AnimationLibrary, CombatTuning, GameSession, LevelData, LevelDatabase,
    PlayerCommands, constants::*, input, ui, world,
};

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    // --level <name|index> (0-indexed)
    let level_key = args
        .iter()
        .position(|a| a == "--level")
        .and_then(|i| args.get(i + 1).cloned());

    let level_db = LevelDatabase::load_from_file(LEVELS_FILE);
    let level = match level_key.as_deref() {
        Some(key) => level_db.find(key).cloned().unwrap_or_else(|| {
            warn!("Unknown level '{}', using the first level", key);
            first_level(&level_db)
        }),
        None => first_level(&level_db),
    };

    let tuning = CombatTuning::load();
    let library = AnimationLibrary::load_from_file(ANIMATIONS_FILE);
    for missing in library.missing_clips() {
        warn!("No clip for '{}'; that state will not be drawn", missing.name());
    }
    let session = GameSession::from_level(&level, &tuning);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: bevy::window::WindowResolution::new(
                    (VIEWPORT_WIDTH * PIXELS_PER_UNIT) as u32,
                    (VIEWPORT_HEIGHT * PIXELS_PER_UNIT) as u32,
                )
                .with_scale_factor_override(1.0),
                title: "Nightpaw".into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(Time::<Fixed>::from_seconds(tuning.fixed_timestep as f64))
        .insert_resource(library)
        .insert_resource(level_db)
        .insert_resource(tuning)
        .insert_resource(ActiveSession(session))
        .init_resource::<PlayerCommands>()
        .init_resource::<world::SheetAtlases>()
        .add_systems(
            Startup,
            (
                world::setup_camera,
                world::load_sprite_sheets,
                world::spawn_arena,
                ui::spawn_health_bar,
            ),
        )
        // Input is captured every frame and consumed by the fixed step
        .add_systems(Update, input::capture_input)
        .add_systems(
            Update,
            (world::sync_actor_sprites, ui::update_health_bar).after(input::capture_input),
        )
        .add_systems(FixedUpdate, world::step_session)
        .run();
}

fn first_level(level_db: &LevelDatabase) -> LevelData {
    level_db.get(0).cloned().unwrap_or_else(LevelData::arena)
}
