//! Realtime fan-out vocabulary
//!
//! Rooms are long-lived subscription groups on the Socket.IO hub; every
//! successful status transition publishes one event per interested room.
//! Delivery is advisory and at-most-once: clients treat every payload as
//! "invalidate and refetch", never as authoritative state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::{KitchenStatus, OrderStatus};

// ==================== Event Names ====================

/// Broadcast to `managers` when a customer places an order
pub const EVENT_NEW_ORDER: &str = "new-order";
/// Broadcast when a manager approves an order
pub const EVENT_ORDER_APPROVED: &str = "order-approved";
/// Broadcast when a manager rejects an order
pub const EVENT_ORDER_REJECTED: &str = "order-rejected";
/// Broadcast on every status change
pub const EVENT_ORDER_UPDATE: &str = "order-update";
/// Client → server: join a room
pub const EVENT_JOIN: &str = "join";
/// Client → server: leave a room
pub const EVENT_LEAVE: &str = "leave";

// ==================== Rooms ====================

/// A named subscription group on the hub
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    /// Manager dashboards
    Managers,
    /// Kitchen display boards
    Kitchen,
    /// Watchers of a single order
    Order(i64),
    /// A customer session (all of that customer's orders)
    Session(String),
}

impl Room {
    /// The wire-level room name (`managers`, `kitchen`, `order_<id>`,
    /// `session_<id>`)
    pub fn channel(&self) -> String {
        match self {
            Self::Managers => "managers".to_string(),
            Self::Kitchen => "kitchen".to_string(),
            Self::Order(id) => format!("order_{id}"),
            Self::Session(id) => format!("session_{id}"),
        }
    }

    /// Parse a wire-level room name back into a typed room
    pub fn parse(channel: &str) -> Option<Room> {
        match channel {
            "managers" => Some(Self::Managers),
            "kitchen" => Some(Self::Kitchen),
            other => {
                if let Some(id) = other.strip_prefix("order_") {
                    id.parse().ok().map(Self::Order)
                } else {
                    other
                        .strip_prefix("session_")
                        .filter(|id| !id.is_empty())
                        .map(|id| Self::Session(id.to_string()))
                }
            }
        }
    }

    /// Joining manager/kitchen rooms requires a staff token; order and
    /// session rooms are capability-based (knowing the id is enough).
    pub fn requires_staff_token(&self) -> bool {
        matches!(self, Self::Managers | Self::Kitchen)
    }
}

// ==================== Payloads ====================

/// Client request to join or leave a room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Wire-level room name, e.g. `"kitchen"` or `"order_42"`
    pub room: String,
    /// Staff JWT, required for `managers` / `kitchen`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// `new-order` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_id: i64,
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i64>,
    pub total: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// `order-approved` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderApproved {
    pub order_id: i64,
    pub expected_completion_at: DateTime<Utc>,
}

/// `order-rejected` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRejected {
    pub order_id: i64,
    pub reason: String,
}

/// `order-update` payload, published on every transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_id: i64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_status: Option<KitchenStatus>,
    pub status_display: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl OrderUpdate {
    /// Build the standard update payload for an order entering `status`
    pub fn for_transition(order_id: i64, status: OrderStatus, message: impl Into<String>) -> Self {
        Self {
            order_id,
            status,
            kitchen_status: status.kitchen_status(),
            status_display: status.display_name().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// The rooms with an interest in this order's transitions
    pub fn interested_rooms(order_id: i64, session_id: &str) -> [Room; 4] {
        [
            Room::Managers,
            Room::Kitchen,
            Room::Order(order_id),
            Room::Session(session_id.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_channels_round_trip() {
        for room in [
            Room::Managers,
            Room::Kitchen,
            Room::Order(42),
            Room::Session("abc-123".to_string()),
        ] {
            assert_eq!(Room::parse(&room.channel()), Some(room.clone()));
        }
        assert_eq!(Room::parse("order_notanumber"), None);
        assert_eq!(Room::parse("session_"), None);
        assert_eq!(Room::parse("lobby"), None);
    }

    #[test]
    fn staff_rooms_are_gated() {
        assert!(Room::Managers.requires_staff_token());
        assert!(Room::Kitchen.requires_staff_token());
        assert!(!Room::Order(1).requires_staff_token());
        assert!(!Room::Session("s".into()).requires_staff_token());
    }

    #[test]
    fn update_payload_carries_kitchen_projection() {
        let update = OrderUpdate::for_transition(7, OrderStatus::InProgress, "cooking");
        assert_eq!(update.kitchen_status, Some(KitchenStatus::Preparing));
        assert_eq!(update.status_display, "Being prepared");

        let update = OrderUpdate::for_transition(7, OrderStatus::PendingApproval, "placed");
        assert_eq!(update.kitchen_status, None);
    }
}
