//! Menu item repository

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::{MenuItem, MenuItemRow};
use crate::utils::{AppError, AppResult};

/// Filters for listing the menu
#[derive(Debug, Default, Clone)]
pub struct MenuFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub available_only: bool,
}

/// Fields for creating a menu item (already validated, price in cents)
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub spice_level: Option<i64>,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Default, Clone)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub spice_level: Option<i64>,
}

pub async fn find_all(pool: &SqlitePool, filter: &MenuFilter) -> AppResult<Vec<MenuItem>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM menu_items WHERE 1 = 1");
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if filter.available_only {
        qb.push(" AND is_available = 1");
    }
    qb.push(" ORDER BY category, name");

    let rows: Vec<MenuItemRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<MenuItem>> {
    let row: Option<MenuItemRow> = sqlx::query_as("SELECT * FROM menu_items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

/// Fetch several menu items at once (order placement lookup)
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> AppResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM menu_items WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    qb.push(")");

    let rows: Vec<MenuItemRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn create(pool: &SqlitePool, item: &NewMenuItem) -> AppResult<MenuItem> {
    let result = sqlx::query(
        "INSERT INTO menu_items \
         (name, description, price_cents, category, image_url, is_available, spice_level, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.price_cents)
    .bind(&item.category)
    .bind(&item.image_url)
    .bind(item.is_available)
    .bind(item.spice_level)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::database("Menu item vanished after insert"))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> AppResult<MenuItem> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;

    let name = data.name.unwrap_or(existing.name);
    let description = data.description.or(existing.description);
    let price_cents = data
        .price_cents
        .unwrap_or_else(|| crate::orders::money::to_cents(existing.price));
    let category = data.category.unwrap_or(existing.category);
    let image_url = data.image_url.or(existing.image_url);
    let is_available = data.is_available.unwrap_or(existing.is_available);
    let spice_level = data.spice_level.or(existing.spice_level);

    sqlx::query(
        "UPDATE menu_items SET name = ?, description = ?, price_cents = ?, category = ?, \
         image_url = ?, is_available = ?, spice_level = ? WHERE id = ?",
    )
    .bind(&name)
    .bind(&description)
    .bind(price_cents)
    .bind(&category)
    .bind(&image_url)
    .bind(is_available)
    .bind(spice_level)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
