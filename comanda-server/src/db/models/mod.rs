//! Database models
//!
//! Each entity has a `*Row` struct mirroring the SQLite columns (cents,
//! status codes as TEXT) and an API-facing struct with decimals and typed
//! enums. Conversions live next to the types.

pub mod dining_table;
pub mod feedback;
pub mod menu_item;
pub mod order;
pub mod staff;

pub use dining_table::DiningTable;
pub use feedback::{Feedback, FeedbackRow};
pub use menu_item::{MenuItem, MenuItemRow};
pub use order::{Order, OrderItem, OrderItemRow, OrderRow};
pub use staff::Staff;
