//! Particle layout generation and scroll-driven morph state.
//!
//! The crate produces equal-length source/target position buffers for a
//! ring of procedurally placed chunks, turns raster images and JSON point
//! lists into target point clouds, and owns the state that couples scroll
//! progress and pointer input to what the renderer draws each frame.
//!
//! Rendering itself lives elsewhere. A host reads [`session::MorphSession`]
//! every frame and re-uploads buffers when [`session::MorphSession::take_changes`]
//! reports a change.

pub mod config;
pub mod error;
pub mod image_sampler;
pub mod interaction;
pub mod layout;
pub mod morph;
pub mod point_file;
pub mod session;

pub use config::MorphConfig;
pub use error::{MorphError, Result};
pub use image_sampler::PointCloud;
pub use interaction::{
    DragRotation, InputEvent, InteractionController, InteractionEffect, PointerClass, PressTarget,
};
pub use layout::{ChunkLayout, ChunkLayoutSpec, generate_chunk_layout};
pub use morph::MorphState;
pub use point_file::{PointListFile, PointRecord};
pub use session::{BufferChanges, FrameParams, MorphSession, ParticleSet, SessionEvent};
