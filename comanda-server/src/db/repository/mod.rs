//! Repository module
//!
//! Plain functions over the shared [`sqlx::SqlitePool`], one module per
//! entity. All queries are runtime-bound (`query` / `query_as`), no
//! compile-time database required.

pub mod dining_table;
pub mod feedback;
pub mod menu_item;
pub mod order;
pub mod staff;
