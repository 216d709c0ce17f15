/// Scroll progress to blend factor, spin angle and reveal flag
use std::f32::consts::TAU;

use constants::scroll::{IDLE_ROTATE_SPEED, IDLE_THRESHOLD, REVEAL_THRESHOLD};

#[derive(Debug, Clone, PartialEq)]
pub struct MorphState {
    progress: f32,
    rotation_y: f32,
    revealed: bool,
    use_image_color: bool,
    reveal_threshold: f32,
    idle_threshold: f32,
    idle_rotate_speed: f32,
}

impl Default for MorphState {
    fn default() -> Self {
        Self::new(REVEAL_THRESHOLD, IDLE_THRESHOLD, IDLE_ROTATE_SPEED)
    }
}

impl MorphState {
    pub fn new(reveal_threshold: f32, idle_threshold: f32, idle_rotate_speed: f32) -> Self {
        Self {
            progress: 0.0,
            rotation_y: 0.0,
            revealed: false,
            use_image_color: false,
            reveal_threshold,
            idle_threshold,
            idle_rotate_speed,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Interpolation weight between source and target. Equal to progress.
    pub fn blend_factor(&self) -> f32 {
        self.progress
    }

    /// Spin of the points around the vertical axis, in radians.
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn use_image_color(&self) -> bool {
        self.use_image_color
    }

    pub fn set_use_image_color(&mut self, enabled: bool) {
        self.use_image_color = enabled;
    }

    /// Apply a scroll update.
    ///
    /// Below 1 the spin angle is a direct function of progress. Returns the
    /// new reveal flag when this update flipped it.
    pub fn set_progress(&mut self, progress: f32) -> Option<bool> {
        if !progress.is_finite() {
            return None;
        }
        let progress = progress.clamp(0.0, 1.0);
        self.progress = progress;

        if progress < 1.0 {
            self.rotation_y = progress * TAU;
        }

        let revealed = progress >= self.reveal_threshold;
        if revealed != self.revealed {
            self.revealed = revealed;
            Some(revealed)
        } else {
            None
        }
    }

    /// Per-frame idle spin, active once scrolling has reached the end.
    pub fn advance_frame(&mut self) -> bool {
        if self.progress >= self.idle_threshold {
            self.rotation_y += self.idle_rotate_speed;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_factor_is_identity() {
        let mut state = MorphState::default();
        for p in [0.0, 0.5, 1.0] {
            state.set_progress(p);
            assert_eq!(state.blend_factor(), p);
        }
    }

    #[test]
    fn rotation_follows_progress_below_end() {
        let mut state = MorphState::default();
        state.set_progress(0.25);
        assert!((state.rotation_y() - TAU / 4.0).abs() < 1e-6);

        // Scrolling back is not integrated: the angle is recomputed.
        state.set_progress(0.1);
        assert!((state.rotation_y() - TAU * 0.1).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_kept_at_the_end() {
        let mut state = MorphState::default();
        state.set_progress(0.995);
        let before = state.rotation_y();
        state.set_progress(1.0);
        assert_eq!(state.rotation_y(), before);
    }

    #[test]
    fn reveal_has_no_hysteresis() {
        let mut state = MorphState::default();
        assert_eq!(state.set_progress(0.989), None);
        assert!(!state.revealed());

        assert_eq!(state.set_progress(0.99), Some(true));
        assert!(state.revealed());
        assert_eq!(state.set_progress(0.995), None);

        assert_eq!(state.set_progress(0.985), Some(false));
        assert!(!state.revealed());
    }

    #[test]
    fn idle_spin_only_near_the_end() {
        let mut state = MorphState::default();
        state.set_progress(0.998);
        let before = state.rotation_y();
        assert!(!state.advance_frame());
        assert_eq!(state.rotation_y(), before);

        state.set_progress(1.0);
        let start = state.rotation_y();
        for _ in 0..10 {
            assert!(state.advance_frame());
        }
        assert!((state.rotation_y() - (start + 10.0 * IDLE_ROTATE_SPEED)).abs() < 1e-5);
    }

    #[test]
    fn progress_is_clamped_and_nan_ignored() {
        let mut state = MorphState::default();
        state.set_progress(1.5);
        assert_eq!(state.progress(), 1.0);
        state.set_progress(-0.2);
        assert_eq!(state.progress(), 0.0);
        state.set_progress(f32::NAN);
        assert_eq!(state.progress(), 0.0);
    }
}
