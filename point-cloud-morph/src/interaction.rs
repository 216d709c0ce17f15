/// Pointer, touch and button input turned into chunk steps or drag rotation
use std::time::Duration;

use constants::interaction::{HOLD_DELAY_MS, HOLD_INTERVAL_MS, ROTATE_SPEED, SWIPE_THRESHOLD_PX};

/// Input device class. Mouse and touch are tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerClass {
    Mouse,
    Touch,
}

/// What was under the pointer when it was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The scene canvas: drag rotates, horizontal swipes step chunks.
    Canvas,
    /// A chunk step button or any other button.
    Button,
    /// The image preview panel or the file picker.
    UiControl,
}

/// Discrete input delivered by the host, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        class: PointerClass,
        target: PressTarget,
        position: [f32; 2],
        /// Active touch points, 1 for the mouse.
        touches: u32,
    },
    PointerMove {
        class: PointerClass,
        position: [f32; 2],
        touches: u32,
    },
    PointerUp {
        class: PointerClass,
        position: [f32; 2],
    },
    /// Pointer left the window. Ends any drag and drops a pending swipe.
    PointerLeave { class: PointerClass },
    /// A chunk step button was pressed; `step` is +1 or -1.
    ButtonDown { step: i32 },
    /// Release, leave or cancel on a chunk button (or anywhere else).
    ButtonUp,
}

/// What the host should do in response to an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEffect {
    /// Change the chunk count by this many steps (callers clamp).
    StepChunks(i32),
    /// The drag rotation changed.
    Rotated(DragRotation),
}

/// Rotation of the outer group applied by pointer drag, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragRotation {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct PointerTrack {
    /// Last position while a rotation drag is active.
    drag_last: Option<[f32; 2]>,
    /// Press x of a possible swipe on the canvas.
    swipe_start_x: Option<f32>,
}

#[derive(Debug, Clone, Copy)]
struct HoldRepeat {
    step: i32,
    held: Duration,
    next_tick: Duration,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    swipe_threshold_px: f32,
    hold_delay: Duration,
    hold_interval: Duration,
    rotate_speed: f32,
    mouse: PointerTrack,
    touch: PointerTrack,
    hold: Option<HoldRepeat>,
    rotation: DragRotation,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(
            SWIPE_THRESHOLD_PX,
            Duration::from_millis(HOLD_DELAY_MS),
            Duration::from_millis(HOLD_INTERVAL_MS),
            ROTATE_SPEED,
        )
    }
}

impl InteractionController {
    pub fn new(
        swipe_threshold_px: f32,
        hold_delay: Duration,
        hold_interval: Duration,
        rotate_speed: f32,
    ) -> Self {
        Self {
            swipe_threshold_px,
            hold_delay,
            // A zero interval would never let the repeat loop finish.
            hold_interval: hold_interval.max(Duration::from_millis(1)),
            rotate_speed,
            mouse: PointerTrack::default(),
            touch: PointerTrack::default(),
            hold: None,
            rotation: DragRotation::default(),
        }
    }

    pub fn rotation(&self) -> DragRotation {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.mouse.drag_last.is_some() || self.touch.drag_last.is_some()
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    fn track_mut(&mut self, class: PointerClass) -> &mut PointerTrack {
        match class {
            PointerClass::Mouse => &mut self.mouse,
            PointerClass::Touch => &mut self.touch,
        }
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: InputEvent) -> Option<InteractionEffect> {
        match event {
            InputEvent::PointerDown {
                class,
                target,
                position,
                touches,
            } => {
                let track = self.track_mut(class);
                // Extra fingers keep the first finger's swipe start.
                if touches > 1 && track.swipe_start_x.is_some() {
                    return None;
                }
                if target == PressTarget::Canvas {
                    track.swipe_start_x = Some(position[0]);
                    if touches == 1 {
                        track.drag_last = Some(position);
                    }
                } else {
                    track.swipe_start_x = None;
                    track.drag_last = None;
                }
                None
            }
            InputEvent::PointerMove {
                class,
                position,
                touches,
            } => {
                let speed = self.rotate_speed;
                let track = self.track_mut(class);
                let last = track.drag_last?;
                if touches != 1 {
                    return None;
                }
                track.drag_last = Some(position);

                let dx = (position[0] - last[0]) * speed;
                let dy = (position[1] - last[1]) * speed;
                self.rotation.y += dx;
                self.rotation.x -= dy;
                Some(InteractionEffect::Rotated(self.rotation))
            }
            InputEvent::PointerUp { class, position } => {
                let threshold = self.swipe_threshold_px;
                let track = self.track_mut(class);
                track.drag_last = None;
                let start_x = track.swipe_start_x.take()?;

                let delta = position[0] - start_x;
                if delta.abs() < threshold {
                    return None;
                }
                Some(InteractionEffect::StepChunks(if delta > 0.0 { 1 } else { -1 }))
            }
            InputEvent::PointerLeave { class } => {
                *self.track_mut(class) = PointerTrack::default();
                None
            }
            InputEvent::ButtonDown { step } => {
                let step = step.signum();
                if step == 0 {
                    return None;
                }
                self.hold = Some(HoldRepeat {
                    step,
                    held: Duration::ZERO,
                    next_tick: self.hold_delay + self.hold_interval,
                });
                Some(InteractionEffect::StepChunks(step))
            }
            InputEvent::ButtonUp => {
                self.hold = None;
                None
            }
        }
    }

    /// Advance the hold-repeat clock.
    ///
    /// After the immediate tick on press, repeats fire at
    /// `delay + k * interval` for k >= 1. Ticks that fall due within `dt`
    /// are summed into one step.
    pub fn advance(&mut self, dt: Duration) -> Option<InteractionEffect> {
        let interval = self.hold_interval;
        let hold = self.hold.as_mut()?;
        hold.held += dt;

        let mut ticks = 0;
        while hold.held >= hold.next_tick {
            ticks += 1;
            hold.next_tick += interval;
        }

        (ticks > 0).then(|| InteractionEffect::StepChunks(hold.step * ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(target: PressTarget, x: f32) -> InputEvent {
        InputEvent::PointerDown {
            class: PointerClass::Mouse,
            target,
            position: [x, 100.0],
            touches: 1,
        }
    }

    fn up(x: f32) -> InputEvent {
        InputEvent::PointerUp {
            class: PointerClass::Mouse,
            position: [x, 100.0],
        }
    }

    fn mouse_move(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove {
            class: PointerClass::Mouse,
            position: [x, y],
            touches: 1,
        }
    }

    /// Total chunk steps for a hold of `ms` milliseconds advanced in 1 ms frames.
    fn hold_steps(ms: u64) -> i32 {
        let mut controller = InteractionController::default();
        let mut steps = match controller.handle(InputEvent::ButtonDown { step: 1 }) {
            Some(InteractionEffect::StepChunks(s)) => s,
            _ => 0,
        };
        for _ in 0..ms {
            if let Some(InteractionEffect::StepChunks(s)) =
                controller.advance(Duration::from_millis(1))
            {
                steps += s;
            }
        }
        controller.handle(InputEvent::ButtonUp);
        steps
    }

    #[test]
    fn swipe_below_threshold_is_ignored() {
        let mut controller = InteractionController::default();
        controller.handle(down(PressTarget::Canvas, 100.0));
        assert_eq!(controller.handle(up(149.0)), None);
    }

    #[test]
    fn swipe_at_threshold_steps_once() {
        let mut controller = InteractionController::default();
        controller.handle(down(PressTarget::Canvas, 100.0));
        assert_eq!(
            controller.handle(up(150.0)),
            Some(InteractionEffect::StepChunks(1))
        );

        controller.handle(down(PressTarget::Canvas, 300.0));
        assert_eq!(
            controller.handle(up(100.0)),
            Some(InteractionEffect::StepChunks(-1))
        );
    }

    #[test]
    fn swipe_is_evaluated_once_on_release() {
        let mut controller = InteractionController::default();
        controller.handle(down(PressTarget::Canvas, 0.0));
        for x in [60.0, 120.0, 180.0] {
            assert!(matches!(
                controller.handle(mouse_move(x, 100.0)),
                Some(InteractionEffect::Rotated(_))
            ));
        }
        assert_eq!(
            controller.handle(up(180.0)),
            Some(InteractionEffect::StepChunks(1))
        );
        // A second release without a press does nothing.
        assert_eq!(controller.handle(up(400.0)), None);
    }

    #[test]
    fn drag_uses_frame_deltas() {
        let mut controller = InteractionController::default();
        controller.handle(down(PressTarget::Canvas, 100.0));
        controller.handle(mouse_move(110.0, 100.0));
        controller.handle(mouse_move(120.0, 90.0));

        let rotation = controller.rotation();
        assert!((rotation.y - 20.0 * ROTATE_SPEED).abs() < 1e-6);
        assert!((rotation.x - 10.0 * ROTATE_SPEED).abs() < 1e-6);

        controller.handle(up(120.0));
        assert!(!controller.is_dragging());
        assert_eq!(controller.handle(mouse_move(500.0, 500.0)), None);
        assert_eq!(controller.rotation(), rotation);
    }

    #[test]
    fn presses_on_controls_neither_rotate_nor_swipe() {
        for target in [PressTarget::Button, PressTarget::UiControl] {
            let mut controller = InteractionController::default();
            controller.handle(down(target, 0.0));
            assert_eq!(controller.handle(mouse_move(80.0, 40.0)), None);
            assert_eq!(controller.handle(up(200.0)), None);
            assert_eq!(controller.rotation(), DragRotation::default());
        }
    }

    #[test]
    fn multi_touch_does_not_rotate() {
        let mut controller = InteractionController::default();
        controller.handle(InputEvent::PointerDown {
            class: PointerClass::Touch,
            target: PressTarget::Canvas,
            position: [0.0, 0.0],
            touches: 2,
        });
        assert!(!controller.is_dragging());

        controller.handle(InputEvent::PointerDown {
            class: PointerClass::Touch,
            target: PressTarget::Canvas,
            position: [0.0, 0.0],
            touches: 1,
        });
        let pinch = InputEvent::PointerMove {
            class: PointerClass::Touch,
            position: [30.0, 0.0],
            touches: 2,
        };
        assert_eq!(controller.handle(pinch), None);
    }

    #[test]
    fn second_finger_keeps_first_swipe_start() {
        let mut controller = InteractionController::default();
        for (x, touches) in [(100.0, 1), (300.0, 2)] {
            controller.handle(InputEvent::PointerDown {
                class: PointerClass::Touch,
                target: PressTarget::Canvas,
                position: [x, 0.0],
                touches,
            });
        }
        let lift = InputEvent::PointerUp {
            class: PointerClass::Touch,
            position: [100.0, 0.0],
        };
        assert_eq!(controller.handle(lift), None);
        let lift_second = InputEvent::PointerUp {
            class: PointerClass::Touch,
            position: [300.0, 0.0],
        };
        assert_eq!(controller.handle(lift_second), None);
    }

    #[test]
    fn mouse_and_touch_share_rotation() {
        let mut controller = InteractionController::default();
        controller.handle(down(PressTarget::Canvas, 0.0));
        controller.handle(mouse_move(10.0, 100.0));
        controller.handle(up(10.0));

        controller.handle(InputEvent::PointerDown {
            class: PointerClass::Touch,
            target: PressTarget::Canvas,
            position: [0.0, 0.0],
            touches: 1,
        });
        controller.handle(InputEvent::PointerMove {
            class: PointerClass::Touch,
            position: [10.0, 0.0],
            touches: 1,
        });
        assert!((controller.rotation().y - 20.0 * ROTATE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn leave_cancels_drag_and_swipe() {
        let mut controller = InteractionController::default();
        controller.handle(down(PressTarget::Canvas, 0.0));
        controller.handle(InputEvent::PointerLeave {
            class: PointerClass::Mouse,
        });
        assert!(!controller.is_dragging());
        assert_eq!(controller.handle(up(300.0)), None);
    }

    #[test]
    fn hold_tick_schedule() {
        assert_eq!(hold_steps(0), 1);
        assert_eq!(hold_steps(399), 1);
        assert_eq!(hold_steps(479), 1);
        assert_eq!(hold_steps(480), 2);
        assert_eq!(hold_steps(500), 2);
        assert_eq!(hold_steps(559), 2);
        assert_eq!(hold_steps(560), 3);
        assert_eq!(hold_steps(1_000), 1 + (1_000 - 400) / 80);
    }

    #[test]
    fn large_time_steps_sum_ticks() {
        let mut controller = InteractionController::default();
        controller.handle(InputEvent::ButtonDown { step: -1 });
        assert_eq!(
            controller.advance(Duration::from_millis(640)),
            Some(InteractionEffect::StepChunks(-3))
        );
    }

    #[test]
    fn release_stops_repeating() {
        let mut controller = InteractionController::default();
        controller.handle(InputEvent::ButtonDown { step: 1 });
        controller.handle(InputEvent::ButtonUp);
        assert!(!controller.is_holding());
        assert_eq!(controller.advance(Duration::from_secs(5)), None);
    }

    #[test]
    fn pressing_again_restarts_the_hold() {
        let mut controller = InteractionController::default();
        controller.handle(InputEvent::ButtonDown { step: 1 });
        controller.advance(Duration::from_millis(470));
        assert_eq!(
            controller.handle(InputEvent::ButtonDown { step: -1 }),
            Some(InteractionEffect::StepChunks(-1))
        );
        assert_eq!(controller.advance(Duration::from_millis(20)), None);
    }
}
