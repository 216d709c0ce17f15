use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use point_cloud_morph::image_sampler::{decode_image, prepare_image};
use point_cloud_morph::{MorphSession, SessionEvent};
use serde::{Deserialize, Serialize};

use crate::engine::core::session::{MorphSessionResource, SessionChanged};
use crate::engine::systems::image_upload::{ImagePreview, show_preview};
use crate::engine::systems::scroll::ScrollTracker;

/// Preview label for uploads that carry no name.
const UPLOAD_LABEL: &str = "upload";

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication with the host page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_session_events,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    // Write events using the non-deprecated method.
    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut session: ResMut<MorphSessionResource>,
    mut scroll: ResMut<ScrollTracker>,
    mut preview: ResMut<ImagePreview>,
    mut images: ResMut<Assets<Image>>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                let mut target = RpcTarget {
                    session: &mut session.0,
                    scroll: &mut *scroll,
                    diagnostics: &*diagnostics,
                    preview: &mut *preview,
                    images: &mut *images,
                };
                if let Some(response) = handle_rpc_request(&request, &mut target) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Forward session changes to the frontend as notifications.
fn forward_session_events(
    mut events: EventReader<SessionChanged>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let (method, params) = session_notification(event.0);
        rpc_interface.send_notification(method, params);
    }
}

fn session_notification(event: SessionEvent) -> (&'static str, serde_json::Value) {
    match event {
        SessionEvent::ChunkCountChanged(count) => {
            ("chunk_count_changed", serde_json::json!({ "count": count }))
        }
        SessionEvent::RevealedChanged(revealed) => {
            ("revealed_changed", serde_json::json!({ "revealed": revealed }))
        }
        SessionEvent::ImageApplied => ("image_applied", serde_json::json!({})),
    }
}

/// Everything a request handler may read or change.
struct RpcTarget<'a> {
    session: &'a mut MorphSession,
    scroll: &'a mut ScrollTracker,
    diagnostics: &'a DiagnosticsStore,
    preview: &'a mut ImagePreview,
    images: &'a mut Assets<Image>,
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(request: &RpcRequest, target: &mut RpcTarget) -> Option<RpcResponse> {
    // Requests without an ID are notifications: run them, answer nothing.
    let result = match request.method.as_str() {
        "set_scroll_progress" => handle_set_scroll_progress(&request.params, target.scroll),
        "step_chunks" => handle_step_chunks(&request.params, target.session),
        "set_chunk_count" => handle_set_chunk_count(&request.params, target.session),
        "upload_image" => handle_upload_image(&request.params, target),
        "get_state" => Ok(session_state(target.session)),
        "get_fps" => handle_get_fps(target.diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                request.id.clone()?,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_set_scroll_progress(
    params: &serde_json::Value,
    scroll: &mut ScrollTracker,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ProgressParams {
        progress: f32,
    }

    let parsed = serde_json::from_value::<ProgressParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected numeric 'progress' parameter"))?;

    // Picked up by the scroll system on the next frame.
    scroll.jump_to(parsed.progress);
    Ok(serde_json::json!({ "progress": scroll.progress() }))
}

fn handle_step_chunks(
    params: &serde_json::Value,
    session: &mut MorphSession,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct StepParams {
        step: i32,
    }

    let parsed = serde_json::from_value::<StepParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected integer 'step' parameter"))?;

    let changed = session.step_chunks(parsed.step);
    Ok(serde_json::json!({
        "changed": changed,
        "count": session.chunk_count()
    }))
}

fn handle_set_chunk_count(
    params: &serde_json::Value,
    session: &mut MorphSession,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct CountParams {
        count: i64,
    }

    let parsed = serde_json::from_value::<CountParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected integer 'count' parameter"))?;

    let changed = session.set_chunk_count(parsed.count);
    Ok(serde_json::json!({
        "changed": changed,
        "count": session.chunk_count()
    }))
}

fn handle_upload_image(
    params: &serde_json::Value,
    target: &mut RpcTarget,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct UploadParams {
        bytes: Vec<u8>,
        #[serde(default)]
        name: Option<String>,
    }

    let parsed = serde_json::from_value::<UploadParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected byte array 'bytes' parameter"))?;

    let decoded = decode_image(&parsed.bytes).map_err(|e| {
        warn!("Image upload: {}", e);
        RpcError::internal_error("Image could not be decoded")
    })?;
    let prepared = prepare_image(&decoded, target.session.config().max_image_dimension);

    if !target.session.upload_prepared_image(&prepared) {
        return Err(RpcError::internal_error("Image has no visible pixels"));
    }
    let label = parsed.name.unwrap_or_else(|| UPLOAD_LABEL.to_string());
    show_preview(target.preview, target.images, label, &prepared);
    Ok(serde_json::json!({ "applied": true }))
}

fn session_state(session: &MorphSession) -> serde_json::Value {
    serde_json::json!({
        "chunk_count": session.chunk_count(),
        "progress": session.morph().progress(),
        "revealed": session.revealed(),
        "has_image": session.has_image(),
        "particle_count": session.particle_count()
    })
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use point_cloud_morph::MorphConfig;

    fn session() -> MorphSession {
        MorphSession::new(MorphConfig {
            particle_count: 500,
            rng_seed: Some(3),
            ..MorphConfig::default()
        })
        .unwrap()
    }

    fn call(
        session: &mut MorphSession,
        scroll: &mut ScrollTracker,
        method: &str,
        params: serde_json::Value,
    ) -> RpcResponse {
        let diagnostics = DiagnosticsStore::default();
        let mut preview = ImagePreview::default();
        let mut images = Assets::<Image>::default();
        let mut target = RpcTarget {
            session,
            scroll,
            diagnostics: &diagnostics,
            preview: &mut preview,
            images: &mut images,
        };
        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        };
        handle_rpc_request(&request, &mut target).unwrap()
    }

    #[test]
    fn chunk_requests_clamp_and_report() {
        let mut s = session();
        let mut scroll = ScrollTracker::default();

        let response = call(&mut s, &mut scroll, "set_chunk_count", serde_json::json!({"count": 50}));
        assert_eq!(response.result.unwrap()["count"], 20);

        let response = call(&mut s, &mut scroll, "step_chunks", serde_json::json!({"step": -3}));
        assert_eq!(response.result.unwrap()["count"], 17);
        assert_eq!(s.chunk_count(), 17);
    }

    #[test]
    fn scroll_progress_moves_the_tracker() {
        let mut s = session();
        let mut scroll = ScrollTracker::default();
        let response = call(
            &mut s,
            &mut scroll,
            "set_scroll_progress",
            serde_json::json!({"progress": 1.5}),
        );
        assert_eq!(response.result.unwrap()["progress"], 1.0);
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn bad_params_and_methods_are_errors() {
        let mut s = session();
        let mut scroll = ScrollTracker::default();

        let response = call(&mut s, &mut scroll, "step_chunks", serde_json::json!({"step": "up"}));
        assert_eq!(response.error.unwrap().code, -32602);

        let response = call(&mut s, &mut scroll, "upload_image", serde_json::json!({"bytes": [1, 2, 3]}));
        assert_eq!(response.error.unwrap().code, -32603);

        let response = call(&mut s, &mut scroll, "no_such_method", serde_json::json!({}));
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn uploads_update_the_preview() {
        let mut s = session();
        let mut scroll = ScrollTracker::default();
        let diagnostics = DiagnosticsStore::default();
        let mut preview = ImagePreview::default();
        let mut images = Assets::<Image>::default();

        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            8,
            6,
            image::Rgba([40, 90, 200, 255]),
        ))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: "upload_image".to_string(),
            params: serde_json::json!({ "bytes": bytes, "name": "portrait.png" }),
            id: Some(serde_json::json!(5)),
        };
        let mut target = RpcTarget {
            session: &mut s,
            scroll: &mut scroll,
            diagnostics: &diagnostics,
            preview: &mut preview,
            images: &mut images,
        };
        let response = handle_rpc_request(&request, &mut target).unwrap();

        assert_eq!(response.result.unwrap()["applied"], true);
        assert!(s.has_image());
        assert_eq!(preview.label.as_deref(), Some("portrait.png"));
        let texture = images.get(&preview.image.unwrap()).unwrap();
        assert_eq!((texture.width(), texture.height()), (8, 6));
    }

    #[test]
    fn state_reflects_the_session() {
        let mut s = session();
        let mut scroll = ScrollTracker::default();
        let state = call(&mut s, &mut scroll, "get_state", serde_json::Value::Null)
            .result
            .unwrap();
        assert_eq!(state["chunk_count"], 4);
        assert_eq!(state["revealed"], false);
        assert_eq!(state["particle_count"], 500);
    }

    #[test]
    fn session_events_map_to_notifications() {
        let (method, params) = session_notification(SessionEvent::ChunkCountChanged(7));
        assert_eq!(method, "chunk_count_changed");
        assert_eq!(params["count"], 7);
        assert_eq!(
            session_notification(SessionEvent::RevealedChanged(true)).0,
            "revealed_changed"
        );
    }
}
