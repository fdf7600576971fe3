//! The publish side of the realtime hub

use std::sync::Arc;

use serde::Serialize;
use shared::realtime::{
    EVENT_NEW_ORDER, EVENT_ORDER_APPROVED, EVENT_ORDER_REJECTED, EVENT_ORDER_UPDATE, NewOrder,
    OrderApproved, OrderRejected, OrderUpdate, Room,
};
use socketioxide::SocketIo;
use socketioxide::layer::SocketIoLayer;
use tracing::{debug, warn};

use crate::auth::JwtService;

/// Shared handle for broadcasting events to rooms
#[derive(Clone)]
pub struct RealtimeHub {
    io: SocketIo,
}

impl RealtimeHub {
    /// Build the hub and the tower layer that serves `/socket.io`.
    ///
    /// The JWT service is handed to the connection handlers so that joins
    /// to staff rooms can be verified.
    pub fn new(jwt: Arc<JwtService>) -> (Self, SocketIoLayer) {
        let (layer, io) = SocketIo::builder().with_state(jwt).build_layer();
        io.ns("/", super::socket::on_connect);
        (Self { io }, layer)
    }

    /// Emit one event to one room. Best-effort: a failed broadcast is
    /// logged and dropped, it never affects the underlying transition.
    pub fn emit(&self, room: &Room, event: &'static str, payload: &impl Serialize) {
        if let Err(e) = self.io.to(room.channel()).emit(event, payload) {
            warn!(
                target: "realtime",
                room = %room.channel(),
                event,
                error = %e,
                "Broadcast failed"
            );
        } else {
            debug!(target: "realtime", room = %room.channel(), event, "Broadcast sent");
        }
    }

    /// Emit one event to several rooms
    pub fn emit_to_all(&self, rooms: &[Room], event: &'static str, payload: &impl Serialize) {
        for room in rooms {
            self.emit(room, event, payload);
        }
    }

    /// `new-order` to the managers room
    pub fn notify_new_order(&self, payload: &NewOrder) {
        self.emit(&Room::Managers, EVENT_NEW_ORDER, payload);
    }

    /// `order-approved` to every interested room
    pub fn notify_approved(&self, rooms: &[Room], payload: &OrderApproved) {
        self.emit_to_all(rooms, EVENT_ORDER_APPROVED, payload);
    }

    /// `order-rejected` to every interested room
    pub fn notify_rejected(&self, rooms: &[Room], payload: &OrderRejected) {
        self.emit_to_all(rooms, EVENT_ORDER_REJECTED, payload);
    }

    /// `order-update` to every interested room
    pub fn notify_update(&self, rooms: &[Room], payload: &OrderUpdate) {
        self.emit_to_all(rooms, EVENT_ORDER_UPDATE, payload);
    }
}
