use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use point_cloud_morph::{MorphConfig, MorphError, MorphSession};

use crate::engine::assets::point_list_asset::{
    PointListAsset, PointListLoader, apply_loaded_point_list, start_point_list_loading,
};
use crate::engine::core::session::{MorphSessionResource, SessionChanged, dispatch_session_events};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::particles::{background_color, spawn_morph_scene};
use crate::engine::shaders::ParticleMorphMaterial;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::image_upload::{
    ImagePreview, apply_finished_images, queue_dropped_images,
};
use crate::engine::systems::input::{
    chunk_button_system, hold_repeat_system, mouse_input_system, touch_input_system,
};
use crate::engine::systems::morph_sync::{animate_morph, sync_particle_buffers};
use crate::engine::systems::scroll::{ScrollTracker, scroll_input_system};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::ui::MorphUiPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::image_upload::queue_default_image;

/// Config file read at start-up on native targets, relative to the working directory.
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "assets/morph_config.json";

fn load_config() -> MorphConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        MorphConfig::load_or_default(std::path::Path::new(CONFIG_PATH))
    }

    #[cfg(target_arch = "wasm32")]
    {
        MorphConfig::default()
    }
}

pub fn create_app() -> Result<App, MorphError> {
    let session = MorphSession::new(load_config())?;

    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MaterialPlugin::<ParticleMorphMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers precomputed point lists as loadable assets.
        .add_plugins(JsonAssetPlugin::<PointListAsset>::new(&["points.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(MorphUiPlugin);

    app.insert_resource(MorphSessionResource(session))
        .insert_resource(background_color())
        .init_resource::<ScrollTracker>()
        .init_resource::<PointListLoader>()
        .init_resource::<ImagePreview>()
        .add_event::<SessionChanged>();

    app.add_systems(Startup, (spawn_morph_scene, start_point_list_loading));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, queue_default_image);
    }

    // Input first, then session updates, then GPU sync; events fan out last.
    app.add_systems(
        Update,
        (
            mouse_input_system,
            touch_input_system,
            chunk_button_system,
            hold_repeat_system,
            scroll_input_system,
            queue_dropped_images,
            apply_finished_images,
            apply_loaded_point_list,
            animate_morph,
            sync_particle_buffers,
            dispatch_session_events,
        )
            .chain(),
    );

    app.add_systems(Update, fps_notification_system);

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    Ok(app)
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
