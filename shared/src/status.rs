//! Order lifecycle status machine
//!
//! A single enum drives the whole lifecycle:
//!
//! ```text
//! pending_approval → approved → in_progress → ready → completed
//!        │               │           │          │
//!        └───────────────┴───────────┴──────────┴──→ cancelled
//! ```
//!
//! The kitchen view ([`KitchenStatus`]) is a projection of [`OrderStatus`],
//! never stored or written independently, so the two can never disagree.
//! A kitchen advance request is translated into the corresponding order
//! transition and validated against the same edge set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failed to parse a status code from the wire / database
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status code: {0}")]
pub struct StatusParseError(pub String);

/// Customer-facing order lifecycle stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by a customer, waiting for a manager decision
    PendingApproval,
    /// Accepted by a manager, queued for the kitchen
    Approved,
    /// Kitchen is preparing the order
    InProgress,
    /// Ready for pickup / serving
    Ready,
    /// Served and closed
    Completed,
    /// Rejected or cancelled before completion
    Cancelled,
}

impl OrderStatus {
    /// Stable code stored in the database and sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label shown in UIs and broadcast messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PendingApproval => "Awaiting approval",
            Self::Approved => "Approved",
            Self::InProgress => "Being prepared",
            Self::Ready => "Ready for pickup",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Terminal states have no outgoing edges
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the machine allows the edge `self → next`
    ///
    /// Forward-only along the main sequence; any non-terminal state may
    /// move to `Cancelled`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        matches!(
            (self, next),
            (Self::PendingApproval, Self::Approved)
                | (Self::Approved, Self::InProgress)
                | (Self::InProgress, Self::Ready)
                | (Self::Ready, Self::Completed)
        )
    }

    /// Kitchen projection of this order state
    ///
    /// `None` means the order is not visible to the kitchen (not yet
    /// approved, or cancelled).
    pub fn kitchen_status(&self) -> Option<KitchenStatus> {
        match self {
            Self::Approved => Some(KitchenStatus::Pending),
            Self::InProgress => Some(KitchenStatus::Preparing),
            Self::Ready => Some(KitchenStatus::Ready),
            Self::Completed => Some(KitchenStatus::Completed),
            Self::PendingApproval | Self::Cancelled => None,
        }
    }

    /// Whether feedback may be submitted for an order in this state
    pub fn accepts_feedback(&self) -> bool {
        matches!(self, Self::Ready | Self::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_approval" => Ok(Self::PendingApproval),
            "approved" => Ok(Self::Approved),
            "in_progress" => Ok(Self::InProgress),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Kitchen-facing preparation stage, derived from [`OrderStatus`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KitchenStatus {
    /// Approved, not yet started
    Pending,
    /// On the line
    Preparing,
    /// Plated, waiting for pickup
    Ready,
    /// Picked up / served
    Completed,
}

impl KitchenStatus {
    /// Stable code used in kitchen API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
        }
    }

    /// The next stage in the fixed kitchen sequence, if any
    pub fn next(&self) -> Option<KitchenStatus> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// The order status this kitchen stage corresponds to
    pub fn order_status(&self) -> OrderStatus {
        match self {
            Self::Pending => OrderStatus::Approved,
            Self::Preparing => OrderStatus::InProgress,
            Self::Ready => OrderStatus::Ready,
            Self::Completed => OrderStatus::Completed,
        }
    }
}

impl fmt::Display for KitchenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KitchenStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "received" is a legacy alias some boards still send
            "pending" | "received" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// How the customer pays. Immutable once the order is placed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "online" => Ok(Self::Online),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}
