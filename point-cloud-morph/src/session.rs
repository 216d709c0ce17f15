/// The morph session: particle buffers, chunk count, loaded image and
/// interaction state in one owner. Hosts write through its operations and
/// read buffers and per-frame parameters back.
use std::time::Duration;

use constants::particles::MAX_CHUNKS;
use constants::render_settings::CAMERA_RING_FACTOR;
use image::RgbaImage;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::MorphConfig;
use crate::error::{MorphError, Result};
use crate::image_sampler::{PointCloud, sample_image, sample_image_bytes};
use crate::interaction::{DragRotation, InputEvent, InteractionController, InteractionEffect};
use crate::layout::{ChunkLayoutSpec, clamp_chunk_count, generate_chunk_layout};
use crate::morph::MorphState;
use crate::point_file::parse_point_list;

/// Source, target and colour buffers, always `particle_count` long.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    pub source: Vec<[f32; 3]>,
    pub target: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl ParticleSet {
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Buffers replaced since the last `take_changes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferChanges {
    /// Source and target positions.
    pub positions: bool,
    pub colors: bool,
}

impl BufferChanges {
    pub fn any(&self) -> bool {
        self.positions || self.colors
    }
}

/// State changes a UI layer may want to reflect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ChunkCountChanged(u32),
    RevealedChanged(bool),
    ImageApplied,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub mix: f32,
    pub use_vertex_color: bool,
    pub brightness: f32,
    /// Spin of the points object around y.
    pub spin_y: f32,
    /// Rotation of the enclosing group from pointer drag.
    pub drag: DragRotation,
    pub camera_z: f32,
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
    pub glow: f32,
    pub revealed: bool,
}

pub struct MorphSession {
    config: MorphConfig,
    chunk_count: u32,
    particles: ParticleSet,
    image: Option<PointCloud>,
    morph: MorphState,
    controller: InteractionController,
    changes: BufferChanges,
    events: Vec<SessionEvent>,
    rng: StdRng,
}

impl MorphSession {
    pub fn new(config: MorphConfig) -> Result<Self> {
        config.validate()?;

        let layout = generate_chunk_layout(config.initial_chunks, config.particle_count, None)?;
        let particles = ParticleSet {
            source: layout.source,
            target: layout.target,
            colors: vec![[1.0; 3]; config.particle_count],
        };
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            "Morph session: {} particles, {} chunks",
            config.particle_count, config.initial_chunks
        );

        Ok(Self {
            chunk_count: config.initial_chunks,
            morph: config.morph_state(),
            controller: config.interaction_controller(),
            config,
            particles,
            image: None,
            changes: BufferChanges {
                positions: true,
                colors: true,
            },
            events: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn particle_count(&self) -> usize {
        self.config.particle_count
    }

    pub fn chunk_count(&self) -> u32 {
        self.chunk_count
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn morph(&self) -> &MorphState {
        &self.morph
    }

    pub fn revealed(&self) -> bool {
        self.morph.revealed()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn drag_rotation(&self) -> DragRotation {
        self.controller.rotation()
    }

    /// Request a chunk count. Out-of-range values are clamped.
    ///
    /// Returns whether the count changed and the layout was rebuilt. A loaded
    /// image stays the target and colours are left alone.
    pub fn set_chunk_count(&mut self, requested: i64) -> bool {
        let count = clamp_chunk_count(requested, self.config.min_chunks, self.config.max_chunks);
        if count == self.chunk_count {
            return false;
        }

        let layout =
            match generate_chunk_layout(count, self.config.particle_count, self.image.as_ref()) {
                Ok(layout) => layout,
                Err(e) => {
                    warn!("Keeping {} chunks: {}", self.chunk_count, e);
                    return false;
                }
            };

        self.particles.source = layout.source;
        self.particles.target = layout.target;
        self.chunk_count = count;
        self.changes.positions = true;
        self.events.push(SessionEvent::ChunkCountChanged(count));
        info!("Chunk count set to {}", count);
        true
    }

    pub fn step_chunks(&mut self, step: i32) -> bool {
        self.set_chunk_count(self.chunk_count as i64 + step as i64)
    }

    pub fn increment_chunks(&mut self) -> bool {
        self.step_chunks(1)
    }

    pub fn decrement_chunks(&mut self) -> bool {
        self.step_chunks(-1)
    }

    /// Point brightness, easing from the single-chunk value to the
    /// many-chunk value with a smoothstep over the chunk range.
    pub fn brightness(&self) -> f32 {
        let span = MAX_CHUNKS.saturating_sub(1).max(1) as f32;
        let t = ((self.chunk_count as f32 - 1.0) / span).clamp(0.0, 1.0);
        let s = t * t * (3.0 - 2.0 * t);
        let (b0, b1) = (
            self.config.point_brightness,
            self.config.point_brightness_when_many,
        );
        b0 + s * (b1 - b0)
    }

    /// Camera distance that keeps the whole ring in view.
    pub fn camera_z(&self) -> f32 {
        let base = self.config.camera_base_z;
        let ring = ChunkLayoutSpec::new(self.chunk_count).ring_radius;
        base.max(base - 1.0 + ring * CAMERA_RING_FACTOR)
    }

    /// Make `cloud` the target and colour source. Returns false for an
    /// empty cloud, leaving the current buffers in place.
    pub fn apply_point_cloud(&mut self, cloud: PointCloud) -> bool {
        if cloud.is_empty() {
            warn!("Ignoring empty point cloud");
            return false;
        }
        let cloud = cloud.fit_to(self.config.particle_count);

        self.particles.target = cloud.positions.clone();
        self.particles.colors = cloud.colors.clone();
        self.image = Some(cloud);
        self.morph.set_use_image_color(true);
        self.changes = BufferChanges {
            positions: true,
            colors: true,
        };
        self.events.push(SessionEvent::ImageApplied);
        info!("Applied image target ({} points)", self.config.particle_count);
        true
    }

    fn apply_result(&mut self, what: &str, result: Result<PointCloud>) -> bool {
        match result {
            Ok(cloud) => self.apply_point_cloud(cloud),
            Err(MorphError::NoVisiblePixels) => {
                warn!("{what}: no visible pixels, keeping current layout");
                false
            }
            Err(e) => {
                warn!("{what}: {e}");
                false
            }
        }
    }

    /// Decode and sample an encoded image. Failures keep the current layout.
    pub fn upload_image_bytes(&mut self, bytes: &[u8]) -> bool {
        let result = sample_image_bytes(
            bytes,
            self.config.particle_count,
            self.config.max_image_dimension,
            &mut self.rng,
        );
        self.apply_result("Image upload", result)
    }

    /// Sample an image that was already decoded and downscaled, e.g. off the
    /// main thread.
    pub fn upload_prepared_image(&mut self, image: &RgbaImage) -> bool {
        let result = sample_image(image, self.config.particle_count, &mut self.rng)
            .ok_or(MorphError::NoVisiblePixels);
        self.apply_result("Image upload", result)
    }

    /// Apply a JSON point list. Failures keep the current layout.
    pub fn apply_point_list_json(&mut self, json: &str) -> bool {
        let result = parse_point_list(json, self.config.particle_count);
        self.apply_result("Point list", result)
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        if let Some(revealed) = self.morph.set_progress(progress) {
            self.events.push(SessionEvent::RevealedChanged(revealed));
        }
    }

    /// Once per rendered frame.
    pub fn advance_frame(&mut self) {
        self.morph.advance_frame();
    }

    /// Feed an input event, applying any chunk step it causes.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<InteractionEffect> {
        let effect = self.controller.handle(event);
        if let Some(InteractionEffect::StepChunks(step)) = effect {
            self.step_chunks(step);
        }
        effect
    }

    /// Advance the hold-repeat clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) -> Option<InteractionEffect> {
        let effect = self.controller.advance(dt);
        if let Some(InteractionEffect::StepChunks(step)) = effect {
            self.step_chunks(step);
        }
        effect
    }

    pub fn take_changes(&mut self) -> BufferChanges {
        std::mem::take(&mut self.changes)
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            mix: self.morph.blend_factor(),
            use_vertex_color: self.morph.use_image_color(),
            brightness: self.brightness(),
            spin_y: self.morph.rotation_y(),
            drag: self.controller.rotation(),
            camera_z: self.camera_z(),
            color_a: self.config.color_a,
            color_b: self.config.color_b,
            glow: self.config.glow,
            revealed: self.morph.revealed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(initial_chunks: u32) -> MorphSession {
        MorphSession::new(MorphConfig {
            particle_count: 1_000,
            initial_chunks,
            rng_seed: Some(1),
            ..MorphConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn new_session_reports_full_upload() {
        let mut s = session(4);
        assert_eq!(s.particles().len(), 1_000);
        assert_eq!(s.particles().target.len(), 1_000);
        assert_eq!(s.particles().colors, vec![[1.0; 3]; 1_000]);
        assert_eq!(
            s.take_changes(),
            BufferChanges {
                positions: true,
                colors: true
            }
        );
        assert!(!s.take_changes().any());
    }

    #[test]
    fn chunk_count_clamps_at_bounds() {
        let mut s = session(20);
        assert!(!s.increment_chunks());
        assert_eq!(s.chunk_count(), 20);

        let mut s = session(1);
        assert!(!s.decrement_chunks());
        assert_eq!(s.chunk_count(), 1);

        assert!(s.set_chunk_count(99));
        assert_eq!(s.chunk_count(), 20);
    }

    #[test]
    fn chunk_change_rebuilds_positions_only() {
        let mut s = session(4);
        s.take_changes();
        assert!(s.increment_chunks());
        assert_eq!(
            s.take_changes(),
            BufferChanges {
                positions: true,
                colors: false
            }
        );
        assert_eq!(s.take_events(), vec![SessionEvent::ChunkCountChanged(5)]);
    }

    #[test]
    fn brightness_and_camera_follow_chunk_count() {
        let mut s = session(1);
        assert!((s.brightness() - 0.65).abs() < 1e-6);
        assert!(s.camera_z() >= 1.0);

        s.set_chunk_count(20);
        assert!((s.brightness() - 0.08).abs() < 1e-6);
        let ring = 0.4 + 0.065 * 20.0;
        assert!((s.camera_z() - ring * 1.8).abs() < 1e-5);
    }

    #[test]
    fn empty_cloud_is_ignored() {
        let mut s = session(4);
        s.take_changes();
        let before = s.particles().clone();
        assert!(!s.apply_point_cloud(PointCloud::uniform(0, [0.0; 3], [0.0; 3])));
        assert_eq!(s.particles(), &before);
        assert!(!s.take_changes().any());
    }

    #[test]
    fn bad_uploads_keep_last_good_buffers() {
        let mut s = session(4);
        let before = s.particles().clone();
        assert!(!s.upload_image_bytes(b"garbage"));
        assert!(!s.apply_point_list_json("[]"));
        assert_eq!(s.particles(), &before);
        assert!(!s.frame_params().use_vertex_color);
    }

    #[test]
    fn prepared_images_apply_like_uploads() {
        let mut s = session(4);
        let blank = RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 255]));
        assert!(!s.upload_prepared_image(&blank));

        let mut dot = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 0]));
        dot.put_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        assert!(s.upload_prepared_image(&dot));
        assert!(s.has_image());
        assert!(s.particles().colors.iter().all(|c| *c == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn drag_does_not_touch_spin() {
        let mut s = session(4);
        s.set_scroll_progress(0.5);
        let spin = s.frame_params().spin_y;
        s.handle_input(InputEvent::PointerDown {
            class: crate::PointerClass::Mouse,
            target: crate::PressTarget::Canvas,
            position: [0.0, 0.0],
            touches: 1,
        });
        s.handle_input(InputEvent::PointerMove {
            class: crate::PointerClass::Mouse,
            position: [40.0, 0.0],
            touches: 1,
        });
        let params = s.frame_params();
        assert_eq!(params.spin_y, spin);
        assert!(params.drag.y > 0.0);
    }
}
