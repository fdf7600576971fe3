//! Manager routes: order approval queue, menu CRUD, statistics, feedback
//!
//! Mounted behind `require_manager`; handlers can rely on a manager
//! principal being present.

use std::collections::BTreeMap;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::OrderStatus;
use tracing::info;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Feedback, MenuItem, Order};
use crate::db::repository::{feedback, menu_item, order};
use crate::orders::money;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Menu prices must be positive and below this ceiling
const MAX_MENU_PRICE: i64 = 10_000;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/manager/orders/pending", get(pending_orders))
        .route("/manager/orders", get(list_orders))
        .route("/manager/orders/{id}/approve", put(approve_order))
        .route("/manager/orders/{id}/reject", put(reject_order))
        .route("/manager/menu", get(list_menu).post(create_menu_item))
        .route(
            "/manager/menu/{id}",
            put(update_menu_item).delete(delete_menu_item),
        )
        .route("/manager/statistics", get(statistics))
        .route("/manager/feedback", get(list_feedback))
}

// ==================== Orders ====================

async fn pending_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = order::find_by_status(state.pool(), OrderStatus::PendingApproval).await?;
    Ok(ok(orders))
}

#[derive(Debug, Deserialize)]
struct ListOrdersQuery {
    status: Option<String>,
    page: Option<i64>,
    per_page: Option<i64>,
}

async fn list_orders(
    State(state): State<ServerState>,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.parse::<OrderStatus>()
                .map_err(|_| AppError::validation(format!("Unknown status filter: {s}")))
        })
        .transpose()?;

    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let orders = order::page(state.pool(), status, per_page, (page - 1) * per_page).await?;
    Ok(ok(orders))
}

#[derive(Debug, Deserialize)]
struct ApproveRequest {
    expected_minutes: i64,
}

async fn approve_order(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(request): Json<ApproveRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders().approve(id, request.expected_minutes).await?;
    info!(order_id = id, by = %user.username, "Approval recorded");
    Ok(ok_with_message(order, "Order approved"))
}

#[derive(Debug, Deserialize)]
struct RejectRequest {
    reason: String,
}

async fn reject_order(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders().reject(id, &request.reason).await?;
    info!(order_id = id, by = %user.username, "Rejection recorded");
    Ok(ok_with_message(order, "Order rejected"))
}

// ==================== Menu CRUD ====================

async fn list_menu(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    // Managers see unavailable items too
    let items = menu_item::find_all(state.pool(), &menu_item::MenuFilter::default()).await?;
    Ok(ok(items))
}

#[derive(Debug, Deserialize)]
struct CreateMenuItemRequest {
    name: String,
    description: Option<String>,
    price: Decimal,
    category: String,
    image_url: Option<String>,
    #[serde(default = "default_available")]
    is_available: bool,
    spice_level: Option<i64>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct UpdateMenuItemRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    category: Option<String>,
    image_url: Option<String>,
    is_available: Option<bool>,
    spice_level: Option<i64>,
}

fn validate_price(price: Decimal) -> AppResult<i64> {
    if price <= Decimal::ZERO || price > Decimal::from(MAX_MENU_PRICE) {
        return Err(AppError::validation(format!(
            "Price must be positive and at most {MAX_MENU_PRICE}"
        )));
    }
    Ok(money::to_cents(price))
}

fn validate_spice_level(level: Option<i64>) -> AppResult<()> {
    if let Some(level) = level {
        if !(0..=5).contains(&level) {
            return Err(AppError::validation("Spice level must be between 0 and 5"));
        }
    }
    Ok(())
}

async fn create_menu_item(
    State(state): State<ServerState>,
    Json(request): Json<CreateMenuItemRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<MenuItem>>)> {
    validate_required_text(&request.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&request.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(request.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(request.image_url.as_deref(), "image_url", MAX_URL_LEN)?;
    validate_spice_level(request.spice_level)?;
    let price_cents = validate_price(request.price)?;

    let item = menu_item::create(
        state.pool(),
        &menu_item::NewMenuItem {
            name: request.name,
            description: request.description,
            price_cents,
            category: request.category,
            image_url: request.image_url,
            is_available: request.is_available,
            spice_level: request.spice_level,
        },
    )
    .await?;
    info!(item_id = item.id, name = %item.name, "Menu item created");
    Ok((StatusCode::CREATED, ok_with_message(item, "Menu item created")))
}

async fn update_menu_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    if let Some(name) = request.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(category) = request.category.as_deref() {
        validate_required_text(category, "category", MAX_NAME_LEN)?;
    }
    validate_optional_text(request.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(request.image_url.as_deref(), "image_url", MAX_URL_LEN)?;
    validate_spice_level(request.spice_level)?;
    let price_cents = request.price.map(validate_price).transpose()?;

    let item = menu_item::update(
        state.pool(),
        id,
        menu_item::MenuItemUpdate {
            name: request.name,
            description: request.description,
            price_cents,
            category: request.category,
            image_url: request.image_url,
            is_available: request.is_available,
            spice_level: request.spice_level,
        },
    )
    .await?;
    info!(item_id = id, "Menu item updated");
    Ok(ok_with_message(item, "Menu item updated"))
}

async fn delete_menu_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    if !menu_item::delete(state.pool(), id).await? {
        return Err(AppError::not_found(format!("Menu item {id} not found")));
    }
    info!(item_id = id, "Menu item deleted");
    Ok(ok_with_message((), "Menu item deleted"))
}

// ==================== Statistics & feedback ====================

#[derive(Debug, Serialize)]
struct StatisticsResponse {
    orders_by_status: BTreeMap<String, i64>,
    orders_today: i64,
    completed_revenue: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_rating: Option<f64>,
}

async fn statistics(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<StatisticsResponse>>> {
    let orders_by_status: BTreeMap<String, i64> = order::status_counts(state.pool())
        .await?
        .into_iter()
        .collect();

    let midnight = Utc::now()
        .date_naive()
        .and_time(chrono::NaiveTime::MIN)
        .and_utc();
    let orders_today = order::count_since(state.pool(), midnight).await?;
    let revenue_cents = order::completed_revenue_cents(state.pool()).await?;
    let average_rating = feedback::average_overall(state.pool()).await?;

    Ok(ok(StatisticsResponse {
        orders_by_status,
        orders_today,
        completed_revenue: money::from_cents(revenue_cents),
        average_rating,
    }))
}

#[derive(Debug, Deserialize)]
struct FeedbackQuery {
    page: Option<i64>,
    per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
struct FeedbackPage {
    feedback: Vec<Feedback>,
    total: i64,
    page: i64,
    per_page: i64,
}

async fn list_feedback(
    State(state): State<ServerState>,
    Query(query): Query<FeedbackQuery>,
) -> AppResult<Json<AppResponse<FeedbackPage>>> {
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let (feedback, total) = feedback::page(state.pool(), per_page, (page - 1) * per_page).await?;
    Ok(ok(FeedbackPage {
        feedback,
        total,
        page,
        per_page,
    }))
}
