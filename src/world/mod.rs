//! Bevy front end: camera, sprites and the fixed-step session driver
//!
//! The session owns all gameplay state. Entities here only mirror it:
//! platforms are spawned once, actor sprites are re-synced every frame
//! from `render()`.

use bevy::{camera::ScalingMode, prelude::*};

use crate::animation::AnimationLibrary;
use crate::constants::*;
use crate::events::{ActorId, GameEvent, serialize_event};
use crate::input::PlayerCommands;
use crate::session::GameSession;

/// The running session
#[derive(Resource)]
pub struct ActiveSession(pub GameSession);

/// Sprite mirroring one actor of the session
#[derive(Component)]
pub struct ActorSprite(pub ActorId);

/// Platform sprite for the current level
#[derive(Component)]
pub struct LevelPlatform;

/// Image and atlas layout per manifest sheet, same order as the library
#[derive(Resource, Default)]
pub struct SheetAtlases {
    pub images: Vec<Handle<Image>>,
    pub layouts: Vec<Handle<TextureAtlasLayout>>,
}

/// Orthographic camera showing the whole level; world origin bottom-left
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(VIEWPORT_WIDTH / 2.0, VIEWPORT_HEIGHT / 2.0, 0.0),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEWPORT_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Load every manifest sheet and build its grid layout
pub fn load_sprite_sheets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    library: Res<AnimationLibrary>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let mut atlases = SheetAtlases::default();
    for sheet in library.sheets() {
        atlases.images.push(asset_server.load(sheet.path.clone()));
        atlases.layouts.push(layouts.add(TextureAtlasLayout::from_grid(
            UVec2::new(sheet.tile_width, sheet.tile_height),
            sheet.columns,
            sheet.rows,
            None,
            None,
        )));
    }
    info!("Prepared {} sprite sheets", atlases.images.len());
    commands.insert_resource(atlases);
}

/// Platform sprites plus one hidden sprite per actor
pub fn spawn_arena(mut commands: Commands, session: Res<ActiveSession>) {
    for platform in &session.0.level().platforms {
        commands.spawn((
            Sprite::from_color(PLATFORM_COLOR, Vec2::new(platform.width, platform.height)),
            Transform::from_translation(platform.center().extend(0.0)),
            LevelPlatform,
        ));
    }

    for actor in session.0.actors() {
        commands.spawn((
            Sprite::default(),
            Transform::from_xyz(0.0, 0.0, 1.0),
            Visibility::Hidden,
            ActorSprite(actor),
        ));
    }
}

/// FixedUpdate: consume buffered presses and advance the session one step
pub fn step_session(
    time: Res<Time>,
    mut input: ResMut<PlayerCommands>,
    mut session: ResMut<ActiveSession>,
) {
    let commands = input.take_presses();
    session.0.tick(time.delta_secs(), &commands);

    for bus_event in session.0.bus_mut().drain() {
        if let GameEvent::Death { actor } = &bus_event.event {
            info!("{} down at {} ms", actor, bus_event.time_ms);
        }
        debug!("{}", serialize_event(bus_event.time_ms, &bus_event.event));
    }
}

/// Copy clip frame, flip, size and position onto each actor sprite.
/// Actors without a frame (missing clip) are hidden.
pub fn sync_actor_sprites(
    session: Res<ActiveSession>,
    library: Res<AnimationLibrary>,
    atlases: Res<SheetAtlases>,
    mut sprites: Query<(&ActorSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    for (actor, mut sprite, mut transform, mut visibility) in &mut sprites {
        let Some(frame) = session.0.render_actor(actor.0, &library) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        let (Some(image), Some(layout)) =
            (atlases.images.get(frame.sheet), atlases.layouts.get(frame.sheet))
        else {
            *visibility = Visibility::Hidden;
            continue;
        };

        sprite.image = image.clone();
        sprite.texture_atlas = Some(TextureAtlas {
            layout: layout.clone(),
            index: frame.index,
        });
        sprite.flip_x = frame.flip_x;
        sprite.custom_size = Some(frame.size);
        transform.translation = frame.position.extend(1.0);
        *visibility = Visibility::Inherited;
    }
}
