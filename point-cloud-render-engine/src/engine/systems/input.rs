/// Mouse, touch and chunk button input forwarded to the morph session
use bevy::input::touch::{TouchInput, TouchPhase, Touches};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved};
use point_cloud_morph::{InputEvent, PointerClass, PressTarget};

use crate::engine::core::session::MorphSessionResource;
use crate::ui::chunk_controls::ChunkStepButton;
use crate::ui::overlays::ImagePreviewPanel;

/// Classify a press by the UI element under the pointer.
pub fn classify_press(over_button: bool, over_panel: bool) -> PressTarget {
    if over_button {
        PressTarget::Button
    } else if over_panel {
        PressTarget::UiControl
    } else {
        PressTarget::Canvas
    }
}

fn is_active(interaction: &Interaction) -> bool {
    matches!(interaction, Interaction::Hovered | Interaction::Pressed)
}

fn current_press_target(
    buttons: &Query<&Interaction, With<Button>>,
    panels: &Query<&Interaction, (With<ImagePreviewPanel>, Without<Button>)>,
) -> PressTarget {
    classify_press(
        buttons.iter().any(is_active),
        panels.iter().any(is_active),
    )
}

pub fn mouse_input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    mut cursor_left: EventReader<CursorLeft>,
    buttons: Query<&Interaction, With<Button>>,
    panels: Query<&Interaction, (With<ImagePreviewPanel>, Without<Button>)>,
    mut session: ResMut<MorphSessionResource>,
    mut last_cursor: Local<Option<Vec2>>,
) {
    for moved in cursor_moved.read() {
        *last_cursor = Some(moved.position);
        session.0.handle_input(InputEvent::PointerMove {
            class: PointerClass::Mouse,
            position: moved.position.to_array(),
            touches: 1,
        });
    }

    if let Some(position) = *last_cursor {
        if mouse.just_pressed(MouseButton::Left) {
            session.0.handle_input(InputEvent::PointerDown {
                class: PointerClass::Mouse,
                target: current_press_target(&buttons, &panels),
                position: position.to_array(),
                touches: 1,
            });
        }
        if mouse.just_released(MouseButton::Left) {
            session.0.handle_input(InputEvent::PointerUp {
                class: PointerClass::Mouse,
                position: position.to_array(),
            });
            session.0.handle_input(InputEvent::ButtonUp);
        }
    }

    if cursor_left.read().last().is_some() {
        *last_cursor = None;
        session.0.handle_input(InputEvent::PointerLeave {
            class: PointerClass::Mouse,
        });
    }
}

pub fn touch_input_system(
    mut touch_events: EventReader<TouchInput>,
    touches: Res<Touches>,
    buttons: Query<&Interaction, With<Button>>,
    panels: Query<&Interaction, (With<ImagePreviewPanel>, Without<Button>)>,
    mut session: ResMut<MorphSessionResource>,
) {
    let active = touches.iter().count() as u32;

    for touch in touch_events.read() {
        let position = touch.position.to_array();
        let event = match touch.phase {
            TouchPhase::Started => InputEvent::PointerDown {
                class: PointerClass::Touch,
                target: current_press_target(&buttons, &panels),
                position,
                touches: active.max(1),
            },
            TouchPhase::Moved => InputEvent::PointerMove {
                class: PointerClass::Touch,
                position,
                touches: active,
            },
            TouchPhase::Ended => InputEvent::PointerUp {
                class: PointerClass::Touch,
                position,
            },
            TouchPhase::Canceled => InputEvent::PointerLeave {
                class: PointerClass::Touch,
            },
        };
        session.0.handle_input(event);

        if matches!(touch.phase, TouchPhase::Ended | TouchPhase::Canceled) {
            session.0.handle_input(InputEvent::ButtonUp);
        }
    }
}

/// Start or stop hold-repeat from the chunk step buttons.
pub fn chunk_button_system(
    buttons: Query<(Entity, &Interaction, &ChunkStepButton), Changed<Interaction>>,
    mut session: ResMut<MorphSessionResource>,
    mut pressed: Local<Option<Entity>>,
) {
    for (entity, interaction, button) in &buttons {
        match interaction {
            Interaction::Pressed => {
                *pressed = Some(entity);
                session.0.handle_input(InputEvent::ButtonDown { step: button.0 });
            }
            _ if *pressed == Some(entity) => {
                *pressed = None;
                session.0.handle_input(InputEvent::ButtonUp);
            }
            _ => {}
        }
    }
}

pub fn hold_repeat_system(time: Res<Time>, mut session: ResMut<MorphSessionResource>) {
    session.0.advance_time(time.delta());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_win_over_panels() {
        assert_eq!(classify_press(true, true), PressTarget::Button);
        assert_eq!(classify_press(false, true), PressTarget::UiControl);
        assert_eq!(classify_press(false, false), PressTarget::Canvas);
    }
}
