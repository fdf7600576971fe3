//! REST API
//!
//! # Route map
//!
//! | Path | Methods | Auth |
//! |------|---------|------|
//! | /health, /health/detailed, /health/readiness, /health/liveness | GET | none |
//! | /auth/login | POST | none |
//! | /menu, /menu/{id}, /tables | GET | none |
//! | /orders | POST | none |
//! | /orders/{id}, /orders/session/{session_id} | GET | none |
//! | /orders/{id}/cancel | PUT | session ownership |
//! | /feedback | POST | none |
//! | /manager/orders/pending, /manager/orders | GET | manager |
//! | /manager/orders/{id}/approve, /manager/orders/{id}/reject | PUT | manager |
//! | /manager/menu | GET, POST | manager |
//! | /manager/menu/{id} | PUT, DELETE | manager |
//! | /manager/statistics, /manager/feedback | GET | manager |
//! | /kitchen/orders/active | GET | kitchen or manager |
//! | /kitchen/orders/{id}/status | PUT | kitchen or manager |
//!
//! Every response uses the `AppResponse {code, message, data}` envelope;
//! success code is `E0000`.

use axum::Router;
use axum::middleware::from_fn_with_state;
use socketioxide::layer::SocketIoLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_kitchen, require_manager};
use crate::core::ServerState;

pub mod auth;
pub mod feedback;
pub mod health;
pub mod kitchen;
pub mod manager;
pub mod menu;
pub mod orders;

/// Build the full application router with middleware and the Socket.IO layer
pub fn build_router(state: ServerState, socket_layer: SocketIoLayer) -> Router {
    let manager_routes = manager::router()
        .route_layer(from_fn_with_state(state.clone(), require_manager));
    let kitchen_routes = kitchen::router()
        .route_layer(from_fn_with_state(state.clone(), require_kitchen));

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(feedback::router())
        .merge(manager_routes)
        .merge(kitchen_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(socket_layer)
        .with_state(state)
}
