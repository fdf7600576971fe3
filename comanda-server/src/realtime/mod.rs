//! Realtime fan-out over Socket.IO
//!
//! [`RealtimeHub`] is an explicitly constructed service owning the
//! `SocketIo` handle; it is injected through `ServerState`, never reached
//! through a global. Broadcasts are advisory: failures are logged and
//! swallowed, and clients always refetch from the REST API on receipt.

pub mod hub;
pub mod socket;

pub use hub::RealtimeHub;
