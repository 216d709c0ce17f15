use bevy::prelude::*;
use point_cloud_morph::{MorphSession, SessionEvent};

/// The single morph session. Systems write through its operations and the
/// renderer reads buffers and frame parameters back.
#[derive(Resource)]
pub struct MorphSessionResource(pub MorphSession);

/// A session state change, re-broadcast for UI and RPC listeners.
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionChanged(pub SessionEvent);

/// Drain the session's change queue into Bevy events.
pub fn dispatch_session_events(
    mut session: ResMut<MorphSessionResource>,
    mut changes: EventWriter<SessionChanged>,
) {
    for event in session.0.take_events() {
        changes.write(SessionChanged(event));
    }
}
