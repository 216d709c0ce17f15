//! Scene setup for the particle morph.
//!
//! Spawns the camera and the two-level particle hierarchy: an outer group
//! carrying the pointer-drag rotation and the particle mesh carrying the
//! scroll spin.

/// Camera, drag group and particle mesh entities.
pub mod particles;
