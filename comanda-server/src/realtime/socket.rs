//! Socket.IO connection handlers
//!
//! Clients join rooms with a `join` event carrying the wire-level room
//! name. Staff rooms (`managers`, `kitchen`) require a valid JWT in the
//! payload; order and session rooms are open, since knowing the id already
//! requires being the customer that owns the session.

use std::sync::Arc;

use serde::Serialize;
use shared::realtime::{EVENT_JOIN, EVENT_LEAVE, JoinRequest, Room};
use socketioxide::extract::{Data, SocketRef, State};
use tracing::{debug, warn};

use crate::auth::{JwtService, StaffRole};

#[derive(Debug, Serialize)]
struct JoinAck {
    room: String,
    joined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Namespace connect handler, registers the room events
pub fn on_connect(socket: SocketRef) {
    debug!(target: "realtime", socket_id = %socket.id, "Client connected");
    socket.on(EVENT_JOIN, handle_join);
    socket.on(EVENT_LEAVE, handle_leave);
}

fn handle_join(socket: SocketRef, Data(req): Data<JoinRequest>, State(jwt): State<Arc<JwtService>>) {
    let Some(room) = Room::parse(&req.room) else {
        ack(&socket, &req.room, Some("Unknown room".to_string()));
        return;
    };

    if room.requires_staff_token() {
        if let Err(reason) = verify_staff_join(&room, req.token.as_deref(), &jwt) {
            warn!(
                target: "security",
                socket_id = %socket.id,
                room = %room.channel(),
                reason,
                "Rejected staff room join"
            );
            ack(&socket, &req.room, Some(reason.to_string()));
            return;
        }
    }

    let _ = socket.join(room.channel());
    debug!(target: "realtime", socket_id = %socket.id, room = %room.channel(), "Joined room");
    ack(&socket, &req.room, None);
}

fn handle_leave(socket: SocketRef, Data(req): Data<JoinRequest>) {
    if let Some(room) = Room::parse(&req.room) {
        let _ = socket.leave(room.channel());
        debug!(target: "realtime", socket_id = %socket.id, room = %room.channel(), "Left room");
    }
}

fn verify_staff_join(
    room: &Room,
    token: Option<&str>,
    jwt: &JwtService,
) -> Result<(), &'static str> {
    let token = token.ok_or("Token required for this room")?;
    let claims = jwt.validate_token(token).map_err(|_| "Invalid token")?;
    let role: StaffRole = claims.role.parse().map_err(|_| "Unknown role")?;

    let allowed = match room {
        Room::Managers => role == StaffRole::Manager,
        // Managers may watch the kitchen board too
        Room::Kitchen => matches!(role, StaffRole::Kitchen | StaffRole::Manager),
        _ => true,
    };
    if allowed {
        Ok(())
    } else {
        Err("Role may not join this room")
    }
}

fn ack(socket: &SocketRef, room: &str, error: Option<String>) {
    let payload = JoinAck {
        room: room.to_string(),
        joined: error.is_none(),
        error,
    };
    if let Err(e) = socket.emit("joined", &payload) {
        debug!(target: "realtime", error = %e, "Join ack failed");
    }
}
