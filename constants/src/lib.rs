//! Shared tunables for the particle morph workspace.
//!
//! Values here are compile-time defaults. The core crate's `MorphConfig`
//! can override most of them at run time.

pub mod image_sampling;
pub mod interaction;
pub mod particles;
pub mod render_settings;
pub mod scroll;
