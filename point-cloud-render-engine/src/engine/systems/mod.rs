//! Per-frame systems connecting Bevy input and rendering to the morph session.
//!
//! Input systems translate window events into session input, the scroll
//! tracker feeds progress, and the sync systems push the resulting state to
//! the particle mesh, material and transforms.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;

/// Default image and drag-and-drop file reads on the async compute pool.
pub mod image_upload;

/// Mouse, touch and chunk button input with hold-repeat timing.
pub mod input;

/// Buffer re-upload, uniform update and transform sync.
pub mod morph_sync;

/// Mouse wheel scroll tracker producing smoothed morph progress.
pub mod scroll;
