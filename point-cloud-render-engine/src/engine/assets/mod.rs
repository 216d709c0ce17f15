//! Start-up assets for the particle morph.
//!
//! Precomputed JSON point lists are loaded through the asset server and
//! applied to the session once ready.

/// JSON point list asset and the system that applies it to the session.
pub mod point_list_asset;
