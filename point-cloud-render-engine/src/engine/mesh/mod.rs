//! Mesh generation for the morphing particle cloud.
//!
//! Each particle is pre-expanded into a screen-aligned quad of six vertices;
//! the vertex shader blends positions and offsets the corners in clip space.

/// Particle quad mesh with source, target and colour attributes.
pub mod particle_mesh;
