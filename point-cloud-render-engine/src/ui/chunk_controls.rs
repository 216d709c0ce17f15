use bevy::prelude::*;

use crate::engine::core::session::{MorphSessionResource, SessionChanged};
use point_cloud_morph::SessionEvent;

const BUTTON_IDLE: Color = Color::srgba(0.0, 0.0, 0.0, 0.4);
const BUTTON_HOVERED: Color = Color::srgba(0.26, 0.28, 0.32, 0.6);
const BUTTON_PRESSED: Color = Color::srgba(0.18, 0.20, 0.24, 0.8);

/// Chunk step applied while this button is held, +1 or -1.
#[derive(Component, Debug, Clone, Copy)]
pub struct ChunkStepButton(pub i32);

#[derive(Component)]
pub struct ChunkCountLabel;

pub fn spawn_chunk_controls(mut commands: Commands, session: Res<MorphSessionResource>) {
    commands
        .spawn((
            Name::new("ChunkControls"),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
            BorderRadius::all(Val::Px(12.0)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-90.0)),
                width: Val::Px(180.0),
                padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                column_gap: Val::Px(12.0),
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::SpaceBetween,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
        ))
        .with_children(|row| {
            spawn_step_button(row, "−", -1);

            row.spawn((
                ChunkCountLabel,
                Name::new("ChunkCount"),
                Text::new(session.0.chunk_count().to_string()),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
            ));

            spawn_step_button(row, "+", 1);
        });
}

fn spawn_step_button(parent: &mut ChildSpawnerCommands, label: &str, step: i32) {
    parent
        .spawn((
            ChunkStepButton(step),
            Button,
            Name::new(if step > 0 { "MoreChunks" } else { "FewerChunks" }),
            BackgroundColor(BUTTON_IDLE),
            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.3)),
            BorderRadius::all(Val::Px(8.0)),
            Node {
                width: Val::Px(44.0),
                height: Val::Px(44.0),
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

pub fn chunk_button_colors(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<ChunkStepButton>),
    >,
) {
    for (interaction, mut bg) in &mut q {
        *bg = BackgroundColor(match *interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        });
    }
}

pub fn update_chunk_label(
    mut events: EventReader<SessionChanged>,
    mut labels: Query<&mut Text, With<ChunkCountLabel>>,
) {
    let Some(count) = events.read().fold(None, |latest, event| match event.0 {
        SessionEvent::ChunkCountChanged(n) => Some(n),
        _ => latest,
    }) else {
        return;
    };

    for mut text in &mut labels {
        text.0 = count.to_string();
    }
}
