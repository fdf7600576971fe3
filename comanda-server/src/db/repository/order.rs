//! Order repository
//!
//! All status mutations are single conditional UPDATEs (`WHERE id = ? AND
//! status = ?`); `rows_affected == 0` means the precondition no longer held
//! and the caller classifies it as not-found vs invalid-transition. This
//! closes the double-approval race: two operators cannot both satisfy the
//! same `WHERE` clause.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::OrderStatus;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::{Order, OrderItemRow, OrderRow};
use crate::utils::AppResult;

/// Fields for inserting a new order (already validated and priced)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_session_id: String,
    pub table_number: Option<i64>,
    pub payment_method: &'static str,
    pub special_instructions: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub special_instructions: Option<String>,
}

/// Insert an order and its items in one transaction, returning the new id
pub async fn insert(pool: &SqlitePool, order: &NewOrder) -> AppResult<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO orders \
         (order_number, customer_session_id, table_number, payment_method, status, \
          special_instructions, subtotal_cents, tax_cents, total_cents, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.order_number)
    .bind(&order.customer_session_id)
    .bind(order.table_number)
    .bind(order.payment_method)
    .bind(OrderStatus::PendingApproval.as_str())
    .bind(&order.special_instructions)
    .bind(order.subtotal_cents)
    .bind(order.tax_cents)
    .bind(order.total_cents)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    let order_id = result.last_insert_rowid();

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_items \
             (order_id, menu_item_id, name, quantity, unit_price_cents, special_instructions) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(&item.special_instructions)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(order_id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let items: Vec<OrderItemRow> =
                sqlx::query_as("SELECT * FROM order_items WHERE order_id = ? ORDER BY id")
                    .bind(id)
                    .fetch_all(pool)
                    .await?;
            Ok(Some(Order::from_parts(row, items)?))
        }
        None => Ok(None),
    }
}

/// Read only the current status, for classifying failed transitions
pub async fn current_status(pool: &SqlitePool, id: i64) -> AppResult<Option<OrderStatus>> {
    let status: Option<(String,)> = sqlx::query_as("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match status {
        Some((code,)) => Ok(Some(code.parse()?)),
        None => Ok(None),
    }
}

pub async fn find_by_session(pool: &SqlitePool, session_id: &str) -> AppResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        "SELECT * FROM orders WHERE customer_session_id = ? ORDER BY created_at DESC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    attach_items(pool, rows).await
}

pub async fn find_by_status(pool: &SqlitePool, status: OrderStatus) -> AppResult<Vec<Order>> {
    let rows: Vec<OrderRow> =
        sqlx::query_as("SELECT * FROM orders WHERE status = ? ORDER BY created_at")
            .bind(status.as_str())
            .fetch_all(pool)
            .await?;
    attach_items(pool, rows).await
}

/// Orders visible on the kitchen board: approved, in progress or ready
pub async fn find_kitchen_active(pool: &SqlitePool) -> AppResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        "SELECT * FROM orders WHERE status IN ('approved', 'in_progress', 'ready') \
         ORDER BY approved_at",
    )
    .fetch_all(pool)
    .await?;
    attach_items(pool, rows).await
}

/// Paginated listing, optionally filtered by status, newest first
pub async fn page(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM orders WHERE 1 = 1");
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(pool).await?;
    attach_items(pool, rows).await
}

/// Batch-load items for a set of order rows (avoids per-order queries)
async fn attach_items(pool: &SqlitePool, rows: Vec<OrderRow>) -> AppResult<Vec<Order>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM order_items WHERE order_id IN (");
    let mut separated = qb.separated(", ");
    for row in &rows {
        separated.push_bind(row.id);
    }
    qb.push(") ORDER BY id");

    let item_rows: Vec<OrderItemRow> = qb.build_query_as().fetch_all(pool).await?;
    let mut by_order: HashMap<i64, Vec<OrderItemRow>> = HashMap::new();
    for item in item_rows {
        by_order.entry(item.order_id).or_default().push(item);
    }

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = by_order.remove(&row.id).unwrap_or_default();
        orders.push(Order::from_parts(row, items)?);
    }
    Ok(orders)
}

// ==================== Conditional transitions ====================

/// pending_approval → approved. Returns false when the precondition failed.
pub async fn approve_pending(
    pool: &SqlitePool,
    id: i64,
    approved_at: DateTime<Utc>,
    expected_completion_at: DateTime<Utc>,
) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'approved', approved_at = ?, expected_completion_at = ? \
         WHERE id = ? AND status = 'pending_approval'",
    )
    .bind(approved_at)
    .bind(expected_completion_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// pending_approval → cancelled with a rejection reason
pub async fn reject_pending(pool: &SqlitePool, id: i64, reason: &str) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'cancelled', rejection_reason = ?, completed_at = ? \
         WHERE id = ? AND status = 'pending_approval'",
    )
    .bind(reason)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Any non-terminal status → cancelled
pub async fn cancel(pool: &SqlitePool, id: i64, reason: Option<&str>) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'cancelled', rejection_reason = COALESCE(?, rejection_reason), \
         completed_at = ? \
         WHERE id = ? AND status IN ('pending_approval', 'approved', 'in_progress', 'ready')",
    )
    .bind(reason)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// One forward step along the main sequence (`from` → `to`), used by the
/// kitchen advance. Stamps `completed_at` when `to` is terminal.
pub async fn advance(
    pool: &SqlitePool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    kitchen_notes: Option<&str>,
    expected_completion_at: Option<DateTime<Utc>>,
) -> AppResult<bool> {
    let completed_at = (to == OrderStatus::Completed).then(Utc::now);
    let result = sqlx::query(
        "UPDATE orders SET status = ?, \
         kitchen_notes = COALESCE(?, kitchen_notes), \
         expected_completion_at = COALESCE(?, expected_completion_at), \
         completed_at = COALESCE(?, completed_at) \
         WHERE id = ? AND status = ?",
    )
    .bind(to.as_str())
    .bind(kitchen_notes)
    .bind(expected_completion_at)
    .bind(completed_at)
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

// ==================== Statistics ====================

pub async fn status_counts(pool: &SqlitePool) -> AppResult<Vec<(String, i64)>> {
    let counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM orders GROUP BY status")
            .fetch_all(pool)
            .await?;
    Ok(counts)
}

/// Revenue from completed orders, in cents
pub async fn completed_revenue_cents(pool: &SqlitePool) -> AppResult<i64> {
    let (sum,): (Option<i64>,) =
        sqlx::query_as("SELECT SUM(total_cents) FROM orders WHERE status = 'completed'")
            .fetch_one(pool)
            .await?;
    Ok(sum.unwrap_or(0))
}

pub async fn count_since(pool: &SqlitePool, since: DateTime<Utc>) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE created_at >= ?")
        .bind(since)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
