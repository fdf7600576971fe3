//! Shared types for the Comanda ordering platform
//!
//! Domain vocabulary used by the server and its clients:
//!
//! - **Status machine** (`status`): order lifecycle states, the derived
//!   kitchen view, payment methods
//! - **Realtime** (`realtime`): room names and event payloads for the
//!   Socket.IO fan-out
//!
//! This crate performs no I/O; everything here is plain data plus the
//! transition rules that keep the order and kitchen views consistent.

pub mod realtime;
pub mod status;

// Re-exports
pub use realtime::{JoinRequest, NewOrder, OrderApproved, OrderRejected, OrderUpdate, Room};
pub use status::{KitchenStatus, OrderStatus, PaymentMethod, StatusParseError};
