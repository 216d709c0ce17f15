/// Run-time overrides for the morph session, read from JSON
use std::fs;
use std::path::Path;
use std::time::Duration;

use constants::image_sampling::{DEFAULT_IMAGE, MAX_IMAGE_DIMENSION};
use constants::interaction::{HOLD_DELAY_MS, HOLD_INTERVAL_MS, ROTATE_SPEED, SWIPE_THRESHOLD_PX};
use constants::particles::{DEFAULT_CHUNKS, MAX_CHUNKS, MIN_CHUNKS, PARTICLE_COUNT};
use constants::render_settings::{
    CAMERA_BASE_Z, COLOR_A, COLOR_B, GLOW, POINT_BRIGHTNESS, POINT_BRIGHTNESS_WHEN_MANY,
};
use constants::scroll::{IDLE_ROTATE_SPEED, IDLE_THRESHOLD, REVEAL_THRESHOLD};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};
use crate::interaction::InteractionController;
use crate::morph::MorphState;

/// Every field falls back to its compile-time default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub particle_count: usize,
    pub initial_chunks: u32,
    pub min_chunks: u32,
    pub max_chunks: u32,
    pub swipe_threshold_px: f32,
    pub hold_delay_ms: u64,
    pub hold_interval_ms: u64,
    pub rotate_speed: f32,
    pub idle_rotate_speed: f32,
    pub reveal_threshold: f32,
    pub idle_threshold: f32,
    pub max_image_dimension: u32,
    pub point_brightness: f32,
    pub point_brightness_when_many: f32,
    pub camera_base_z: f32,
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
    pub glow: f32,
    /// Fixed seed for image sampling; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Image applied at start-up by hosts, relative to their asset root.
    pub default_image: Option<String>,
    /// JSON point list applied at start-up by hosts.
    pub point_list_asset: Option<String>,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            initial_chunks: DEFAULT_CHUNKS,
            min_chunks: MIN_CHUNKS,
            max_chunks: MAX_CHUNKS,
            swipe_threshold_px: SWIPE_THRESHOLD_PX,
            hold_delay_ms: HOLD_DELAY_MS,
            hold_interval_ms: HOLD_INTERVAL_MS,
            rotate_speed: ROTATE_SPEED,
            idle_rotate_speed: IDLE_ROTATE_SPEED,
            reveal_threshold: REVEAL_THRESHOLD,
            idle_threshold: IDLE_THRESHOLD,
            max_image_dimension: MAX_IMAGE_DIMENSION,
            point_brightness: POINT_BRIGHTNESS,
            point_brightness_when_many: POINT_BRIGHTNESS_WHEN_MANY,
            camera_base_z: CAMERA_BASE_Z,
            color_a: COLOR_A,
            color_b: COLOR_B,
            glow: GLOW,
            rng_seed: None,
            default_image: Some(DEFAULT_IMAGE.to_string()),
            point_list_asset: None,
        }
    }
}

impl MorphConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(MorphError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(MorphError::Config("particle_count must be positive".into()));
        }
        if self.min_chunks < MIN_CHUNKS || self.max_chunks > MAX_CHUNKS {
            return Err(MorphError::Config(format!(
                "chunk bounds must lie within [{MIN_CHUNKS}, {MAX_CHUNKS}]"
            )));
        }
        if !(self.min_chunks..=self.max_chunks).contains(&self.initial_chunks) {
            return Err(MorphError::Config(format!(
                "initial_chunks {} outside [{}, {}]",
                self.initial_chunks, self.min_chunks, self.max_chunks
            )));
        }
        if self.hold_interval_ms == 0 {
            return Err(MorphError::Config("hold_interval_ms must be positive".into()));
        }
        if self.max_image_dimension == 0 {
            return Err(MorphError::Config("max_image_dimension must be positive".into()));
        }
        Ok(())
    }

    pub fn morph_state(&self) -> MorphState {
        MorphState::new(
            self.reveal_threshold,
            self.idle_threshold,
            self.idle_rotate_speed,
        )
    }

    pub fn interaction_controller(&self) -> InteractionController {
        InteractionController::new(
            self.swipe_threshold_px,
            Duration::from_millis(self.hold_delay_ms),
            Duration::from_millis(self.hold_interval_ms),
            self.rotate_speed,
        )
    }
}
