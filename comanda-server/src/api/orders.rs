//! Customer order routes
//!
//! Customer request bodies are camelCase (the web client's convention);
//! responses carry the snake_case `Order` model inside the envelope.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use shared::PaymentMethod;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::order;
use crate::orders::{OrderLine, PlaceOrder};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/session/{session_id}", get(list_session_orders))
        .route("/orders/{id}/cancel", put(cancel_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderRequest {
    customer_session_id: String,
    table_number: Option<i64>,
    payment_method: PaymentMethod,
    special_instructions: Option<String>,
    items: Vec<PlaceOrderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderItem {
    menu_item_id: i64,
    quantity: i64,
    special_instructions: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelOrderRequest {
    customer_session_id: String,
    reason: Option<String>,
}

async fn place_order(
    State(state): State<ServerState>,
    Json(request): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<Order>>)> {
    let order = state
        .orders()
        .place(PlaceOrder {
            customer_session_id: request.customer_session_id,
            table_number: request.table_number,
            payment_method: request.payment_method,
            special_instructions: request.special_instructions,
            items: request
                .items
                .into_iter()
                .map(|item| OrderLine {
                    menu_item_id: item.menu_item_id,
                    quantity: item.quantity,
                    special_instructions: item.special_instructions,
                })
                .collect(),
        })
        .await?;
    Ok((StatusCode::CREATED, ok_with_message(order, "Order placed")))
}

async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = order::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(ok(order))
}

async fn list_session_orders(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = order::find_by_session(state.pool(), &session_id).await?;
    Ok(ok(orders))
}

async fn cancel_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(request): Json<CancelOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders()
        .cancel(id, &request.customer_session_id, request.reason.as_deref())
        .await?;
    Ok(ok_with_message(order, "Order cancelled"))
}
