//! Menu item model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::orders::money;

/// Raw menu item row
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub spice_level: Option<i64>,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// API-facing menu item
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: money::from_cents(row.price_cents),
            category: row.category,
            image_url: row.image_url,
            is_available: row.is_available,
            spice_level: row.spice_level,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}
