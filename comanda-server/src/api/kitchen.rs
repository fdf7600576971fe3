//! Kitchen routes: the active board and status advances
//!
//! The kitchen speaks in kitchen stages (`pending`, `preparing`, `ready`,
//! `completed`; `received` accepted as a legacy alias for `pending`). Every
//! advance maps onto the underlying order transition and is rejected when
//! the board is stale.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use shared::KitchenStatus;
use tracing::info;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::order;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/kitchen/orders/active", get(active_orders))
        .route("/kitchen/orders/{id}/status", put(update_status))
}

/// The kitchen board, grouped by stage (completed orders drop off)
#[derive(Debug, Default, Serialize)]
struct KitchenBoard {
    pending: Vec<Order>,
    preparing: Vec<Order>,
    ready: Vec<Order>,
}

async fn active_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<KitchenBoard>>> {
    let mut board = KitchenBoard::default();
    for order in order::find_kitchen_active(state.pool()).await? {
        match order.kitchen_status {
            Some(KitchenStatus::Pending) => board.pending.push(order),
            Some(KitchenStatus::Preparing) => board.preparing.push(order),
            Some(KitchenStatus::Ready) => board.ready.push(order),
            _ => {}
        }
    }
    Ok(ok(board))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status_code: String,
    expected_minutes: Option<i64>,
    notes: Option<String>,
}

async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let target: KitchenStatus = request.status_code.parse().map_err(|_| {
        AppError::validation(format!("Unknown kitchen status: {}", request.status_code))
    })?;

    let order = state
        .orders()
        .advance_kitchen(id, target, request.notes.as_deref(), request.expected_minutes)
        .await?;
    info!(order_id = id, status = %target, by = %user.username, "Kitchen status updated");
    Ok(ok_with_message(order, "Order status updated"))
}
