//! Dining table model

use serde::Serialize;
use sqlx::FromRow;

/// A numbered seating unit from the fixed pool
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiningTable {
    pub id: i64,
    pub table_number: i64,
    pub capacity: i64,
    pub is_available: bool,
}
