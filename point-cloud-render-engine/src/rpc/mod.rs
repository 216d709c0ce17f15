//! JSON-RPC 2.0 bridge between the morph and the page embedding it.
//!
//! On wasm the app listens for `message` events carrying JSON-RPC strings and
//! answers through `window.parent.postMessage`. Native builds run the same
//! handlers but have no transport, so responses are dropped.
//!
//! ## Requests
//! - `set_scroll_progress {progress}`: move the scroll tracker to a progress in `[0, 1]`
//! - `step_chunks {step}`: add `step` to the chunk count (clamped)
//! - `set_chunk_count {count}`: set the chunk count (clamped)
//! - `upload_image {bytes, name?}`: decode and sample an encoded image, then show it in
//!   the preview panel under `name`
//! - `get_state`: chunk count, progress, revealed flag, image presence, particle count
//! - `get_fps`: smoothed frame rate
//!
//! Requests without an `id` run without a reply. Bad params answer `-32602`,
//! failed uploads `-32603` and unknown methods `-32601`.
//!
//! ## Notifications
//! - `chunk_count_changed {count}`, `revealed_changed {revealed}`, `image_applied`
//! - `fps_update {fps}` every half second
//! - `debug_message {message}` for messages that are not valid requests

pub mod web_rpc;
