/// Image files read off the main thread and applied to the session
use std::path::{Path, PathBuf};

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};
use bevy::window::FileDragAndDrop;
use image::RgbaImage;
use point_cloud_morph::MorphError;
use point_cloud_morph::image_sampler::{decode_image, prepare_image};

use crate::engine::core::session::MorphSessionResource;

/// The image most recently applied, for the preview panel.
#[derive(Resource, Default, Debug)]
pub struct ImagePreview {
    pub label: Option<String>,
    pub image: Option<Handle<Image>>,
}

/// Pending read and decode. The entity is despawned once the task finishes.
#[derive(Component)]
pub struct ImageReadTask {
    label: String,
    task: Task<Result<RgbaImage, MorphError>>,
}

/// Read, decode and downscale on a worker thread.
fn read_prepared(path: &Path, max_dimension: u32) -> Result<RgbaImage, MorphError> {
    let bytes = std::fs::read(path)?;
    let decoded = decode_image(&bytes)?;
    Ok(prepare_image(&decoded, max_dimension))
}

/// Texture for the preview panel from a prepared image.
pub fn preview_texture(image: &RgbaImage) -> Image {
    let (width, height) = image.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        image.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// Show `image` in the preview panel under `label`.
pub fn show_preview(
    preview: &mut ImagePreview,
    images: &mut Assets<Image>,
    label: String,
    image: &RgbaImage,
) {
    preview.label = Some(label);
    preview.image = Some(images.add(preview_texture(image)));
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn spawn_read(commands: &mut Commands, path: PathBuf, max_dimension: u32) {
    let label = file_label(&path);
    let task =
        AsyncComputeTaskPool::get().spawn(async move { read_prepared(&path, max_dimension) });
    commands.spawn(ImageReadTask { label, task });
}

/// Queue the configured start-up image from the asset folder. Skipped when a
/// point list is configured, which takes its place.
pub fn queue_default_image(mut commands: Commands, session: Res<MorphSessionResource>) {
    let config = session.0.config();
    if config.point_list_asset.is_some() {
        return;
    }
    if let Some(name) = &config.default_image {
        spawn_read(
            &mut commands,
            Path::new("assets").join(name),
            config.max_image_dimension,
        );
    }
}

/// Queue files dropped onto the window.
pub fn queue_dropped_images(
    mut commands: Commands,
    mut drops: EventReader<FileDragAndDrop>,
    session: Res<MorphSessionResource>,
) {
    for drop in drops.read() {
        if let FileDragAndDrop::DroppedFile { path_buf, .. } = drop {
            info!("Image dropped: {}", path_buf.display());
            spawn_read(
                &mut commands,
                path_buf.clone(),
                session.0.config().max_image_dimension,
            );
        }
    }
}

/// Apply reads as they complete; with several in flight the last to finish wins.
pub fn apply_finished_images(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ImageReadTask)>,
    mut session: ResMut<MorphSessionResource>,
    mut preview: ResMut<ImagePreview>,
    mut images: ResMut<Assets<Image>>,
) {
    for (entity, mut pending) in &mut tasks {
        let Some(result) = block_on(future::poll_once(&mut pending.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result {
            Ok(image) => {
                if session.0.upload_prepared_image(&image) {
                    show_preview(&mut preview, &mut images, pending.label.clone(), &image);
                }
            }
            Err(MorphError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No image at {}, keeping chunk layout", pending.label);
            }
            Err(e) => warn!("Could not load {}: {}", pending.label, e),
        }
    }
}
