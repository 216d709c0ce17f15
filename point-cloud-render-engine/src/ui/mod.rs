//! On-screen controls and overlays built with Bevy UI.
//!
//! The chunk stepper mirrors the session's chunk count, the reveal title
//! follows the revealed flag and the preview panel shows the last applied
//! image. All of them react to `SessionChanged` events rather than polling.

use bevy::prelude::*;

/// Chunk count stepper: `−`, count label, `+`.
pub mod chunk_controls;

/// Reveal title, image preview panel and native FPS text.
pub mod overlays;

use chunk_controls::{chunk_button_colors, spawn_chunk_controls, update_chunk_label};
use overlays::{spawn_overlays, update_image_preview, update_reveal_title};

pub struct MorphUiPlugin;

impl Plugin for MorphUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_chunk_controls, spawn_overlays))
            .add_systems(
                Update,
                (
                    chunk_button_colors,
                    update_chunk_label,
                    update_reveal_title,
                    update_image_preview,
                ),
            );
    }
}
