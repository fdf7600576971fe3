//! Public menu and table routes (read-only; managers edit via /manager/menu)

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{DiningTable, MenuItem};
use crate::db::repository::{dining_table, menu_item};
use crate::utils::{AppError, AppResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/menu", get(list_menu))
        .route("/menu/{id}", get(get_menu_item))
        .route("/tables", get(list_tables))
}

#[derive(Debug, Default, Deserialize)]
struct MenuQuery {
    category: Option<String>,
    search: Option<String>,
    /// `available=true` hides 86'd items
    available: Option<bool>,
}

async fn list_menu(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let filter = menu_item::MenuFilter {
        category: query.category,
        search: query.search,
        available_only: query.available.unwrap_or(false),
    };
    let items = menu_item::find_all(state.pool(), &filter).await?;
    Ok(ok(items))
}

async fn get_menu_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let item = menu_item::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;
    Ok(ok(item))
}

async fn list_tables(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<DiningTable>>>> {
    let tables = dining_table::find_all(state.pool()).await?;
    Ok(ok(tables))
}
