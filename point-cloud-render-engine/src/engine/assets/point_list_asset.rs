use bevy::asset::LoadState;
use bevy::prelude::*;
use point_cloud_morph::PointListFile;
use serde::Deserialize;

use crate::engine::core::session::MorphSessionResource;

/// Point list file registered with the JSON asset loader for `*.points.json`.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct PointListAsset(pub PointListFile);

#[derive(Resource, Default)]
pub struct PointListLoader {
    handle: Option<Handle<PointListAsset>>,
}

/// Request the configured point list, if any.
pub fn start_point_list_loading(
    mut loader: ResMut<PointListLoader>,
    session: Res<MorphSessionResource>,
    asset_server: Res<AssetServer>,
) {
    if let Some(path) = session.0.config().point_list_asset.clone() {
        info!("Loading point list {}", path);
        loader.handle = Some(asset_server.load(path));
    }
}

/// Apply the point list once loaded. Runs until the load finishes either way.
pub fn apply_loaded_point_list(
    mut loader: ResMut<PointListLoader>,
    mut session: ResMut<MorphSessionResource>,
    asset_server: Res<AssetServer>,
    point_lists: Res<Assets<PointListAsset>>,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };

    if let Some(asset) = point_lists.get(handle) {
        let count = session.0.particle_count();
        match asset.0.to_point_cloud(count) {
            Ok(cloud) => {
                session.0.apply_point_cloud(cloud);
            }
            Err(e) => warn!("Point list rejected: {}", e),
        }
        loader.handle = None;
        return;
    }

    if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("Point list failed to load: {}", err);
        loader.handle = None;
    }
}
