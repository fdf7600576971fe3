//! Order and order item models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{KitchenStatus, OrderStatus, PaymentMethod, StatusParseError};
use sqlx::FromRow;

use crate::orders::money;

/// Raw order row
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub order_number: String,
    pub customer_session_id: String,
    pub table_number: Option<i64>,
    pub payment_method: String,
    pub status: String,
    pub special_instructions: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub rejection_reason: Option<String>,
    pub kitchen_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub expected_completion_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Raw order item row
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub special_instructions: Option<String>,
}

/// One line of an order, with the price captured at order time
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        let unit_price = money::from_cents(row.unit_price_cents);
        Self {
            id: row.id,
            menu_item_id: row.menu_item_id,
            name: row.name,
            quantity: row.quantity,
            unit_price,
            line_total: unit_price * Decimal::from(row.quantity),
            special_instructions: row.special_instructions,
        }
    }
}

/// API-facing order with its items and the derived kitchen view
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i64>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Projection of `status`; never stored independently
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_status: Option<KitchenStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_completion_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Assemble an order from its row and item rows.
    ///
    /// Fails only on a corrupt status / payment-method column.
    pub fn from_parts(row: OrderRow, items: Vec<OrderItemRow>) -> Result<Self, StatusParseError> {
        let status: OrderStatus = row.status.parse()?;
        Ok(Self {
            id: row.id,
            order_number: row.order_number,
            customer_session_id: row.customer_session_id,
            table_number: row.table_number,
            payment_method: row.payment_method.parse()?,
            status,
            kitchen_status: status.kitchen_status(),
            special_instructions: row.special_instructions,
            subtotal: money::from_cents(row.subtotal_cents),
            tax: money::from_cents(row.tax_cents),
            total: money::from_cents(row.total_cents),
            rejection_reason: row.rejection_reason,
            kitchen_notes: row.kitchen_notes,
            created_at: row.created_at,
            approved_at: row.approved_at,
            expected_completion_at: row.expected_completion_at,
            completed_at: row.completed_at,
            items: items.into_iter().map(OrderItem::from).collect(),
        })
    }
}
