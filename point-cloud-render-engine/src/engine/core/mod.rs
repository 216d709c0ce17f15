//! Core application setup and session ownership.
//!
//! Builds the Bevy app for native and WASM targets and wraps the morph
//! session in a resource that every runtime system reads or writes.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers the morph material, JSON point list assets, the web RPC bridge
/// and the ordered runtime systems.
pub mod app_setup;

/// Morph session resource and the event fan-out for session changes.
pub mod session;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
