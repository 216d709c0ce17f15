/// Virtual page scroll driving morph progress
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::scroll::{SCROLL_LENGTH_PX, SCROLL_LERP, WHEEL_LINE_PX};

use crate::engine::core::session::MorphSessionResource;

/// Remaining distance (px) below which the smoothed position snaps to the target.
const SNAP_PX: f32 = 0.5;

/// Smoothed scroll position over a virtual page of `length` pixels.
#[derive(Resource, Debug, Clone)]
pub struct ScrollTracker {
    length: f32,
    lerp: f32,
    target: f32,
    current: f32,
    last_sent: Option<f32>,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(SCROLL_LENGTH_PX, SCROLL_LERP)
    }
}

impl ScrollTracker {
    pub fn new(length: f32, lerp: f32) -> Self {
        Self {
            length: length.max(1.0),
            lerp: lerp.clamp(0.0, 1.0),
            target: 0.0,
            current: 0.0,
            last_sent: None,
        }
    }

    /// Move the target by `delta` pixels, positive scrolling down the page.
    pub fn scroll_by(&mut self, delta: f32) {
        self.target = (self.target + delta).clamp(0.0, self.length);
    }

    /// Jump straight to `progress` without smoothing.
    pub fn jump_to(&mut self, progress: f32) {
        if progress.is_nan() {
            return;
        }
        self.target = progress.clamp(0.0, 1.0) * self.length;
        self.current = self.target;
    }

    /// Advance the smoothing by one frame.
    pub fn step(&mut self) {
        let remaining = self.target - self.current;
        if remaining.abs() < SNAP_PX {
            self.current = self.target;
        } else {
            self.current += remaining * self.lerp;
        }
    }

    pub fn progress(&self) -> f32 {
        self.current / self.length
    }

    /// Progress if it moved since the last call.
    pub fn take_update(&mut self) -> Option<f32> {
        let progress = self.progress();
        if self.last_sent == Some(progress) {
            return None;
        }
        self.last_sent = Some(progress);
        Some(progress)
    }
}

pub fn scroll_input_system(
    mut wheel: EventReader<MouseWheel>,
    mut tracker: ResMut<ScrollTracker>,
    mut session: ResMut<MorphSessionResource>,
) {
    for event in wheel.read() {
        let pixels = match event.unit {
            MouseScrollUnit::Line => event.y * WHEEL_LINE_PX,
            MouseScrollUnit::Pixel => event.y,
        };
        // Wheel y is positive when scrolling up.
        tracker.scroll_by(-pixels);
    }

    tracker.step();
    if let Some(progress) = tracker.take_update() {
        session.0.set_scroll_progress(progress);
    }
}
