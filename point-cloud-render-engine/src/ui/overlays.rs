use bevy::prelude::*;
use point_cloud_morph::SessionEvent;

use crate::engine::core::session::SessionChanged;
use crate::engine::systems::image_upload::ImagePreview;

const DEFAULT_TITLE: &str = "Particle Morph";

#[derive(Component)]
pub struct FpsText;

/// Title shown once the morph is revealed.
#[derive(Component)]
pub struct RevealTitle;

/// Preview of the applied image. Presses inside it never rotate or swipe.
#[derive(Component)]
pub struct ImagePreviewPanel;

#[derive(Component)]
pub struct PreviewLabel;

#[derive(Component)]
pub struct PreviewImage;

pub fn spawn_overlays(mut commands: Commands) {
    commands.spawn((
        RevealTitle,
        Name::new("RevealTitle"),
        Text::new(DEFAULT_TITLE),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(48.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        TextLayout::new_with_justify(JustifyText::Center),
        Visibility::Hidden,
    ));

    commands
        .spawn((
            ImagePreviewPanel,
            Name::new("ImagePreview"),
            Interaction::default(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.2)),
            BorderRadius::all(Val::Px(12.0)),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(24.0),
                right: Val::Px(24.0),
                width: Val::Px(200.0),
                max_height: Val::Px(280.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                border: UiRect::all(Val::Px(1.0)),
                overflow: Overflow::clip(),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel.spawn((
                PreviewLabel,
                Text::new(idle_preview_text()),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                    ..default()
                },
            ));
            panel.spawn((
                PreviewImage,
                ImageNode::default(),
                Node {
                    width: Val::Percent(100.0),
                    max_height: Val::Px(240.0),
                    display: Display::None,
                    ..default()
                },
            ));
        });

    #[cfg(not(target_arch = "wasm32"))]
    {
        commands.spawn((
            Text::new("FPS: "),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::srgb(1., 0., 0.)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(12.0),
                right: Val::Px(12.0),
                ..default()
            },
            FpsText,
        ));
    }
}

fn idle_preview_text() -> &'static str {
    if cfg!(target_arch = "wasm32") {
        "No image loaded"
    } else {
        "Drop an image onto the window"
    }
}

pub fn update_reveal_title(
    mut events: EventReader<SessionChanged>,
    preview: Res<ImagePreview>,
    mut titles: Query<(&mut Visibility, &mut Text), With<RevealTitle>>,
) {
    let Some(revealed) = events.read().fold(None, |latest, event| match event.0 {
        SessionEvent::RevealedChanged(on) => Some(on),
        _ => latest,
    }) else {
        return;
    };

    for (mut visibility, mut text) in &mut titles {
        *visibility = if revealed {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        text.0 = preview
            .label
            .as_deref()
            .map(|label| label.rsplit_once('.').map_or(label, |(stem, _)| stem))
            .unwrap_or(DEFAULT_TITLE)
            .to_string();
    }
}

pub fn update_image_preview(
    preview: Res<ImagePreview>,
    mut labels: Query<&mut Text, With<PreviewLabel>>,
    mut images: Query<(&mut ImageNode, &mut Node), With<PreviewImage>>,
) {
    if !preview.is_changed() {
        return;
    }

    if let Some(label) = &preview.label {
        for mut text in &mut labels {
            text.0 = label.clone();
        }
    }
    if let Some(handle) = &preview.image {
        for (mut image, mut node) in &mut images {
            image.image = handle.clone();
            node.display = Display::Flex;
        }
    }
}
