//! End-to-end order flow over the HTTP surface
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`: staff
//! login, order placement, manager approval, the kitchen sequence and
//! feedback, plus the auth and validation failure paths.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use comanda_server::auth::JwtConfig;
use comanda_server::db::repository::menu_item::{self, NewMenuItem};
use comanda_server::{Config, ServerState};

struct TestApp {
    _dir: tempfile::TempDir,
    app: Router,
    menu_item_id: i64,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        http_port: 0,
        database_url: format!("sqlite://{}", dir.path().join("flow-test.db").display()),
        environment: "development".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-at-least-32-bytes".to_string(),
            expiration_minutes: 60,
            issuer: "comanda-server".to_string(),
            audience: "comanda-clients".to_string(),
        },
        tax_rate: "0.08".parse().unwrap(),
        table_count: 22,
        dev_auth_fallback: false,
        log_level: "info".to_string(),
        log_json: false,
        log_dir: None,
        manager_username: "manager".to_string(),
        manager_password: "manager123".to_string(),
        kitchen_username: "kitchen".to_string(),
        kitchen_password: "kitchen123".to_string(),
    };

    let (state, socket_layer) = ServerState::initialize(&config).await.unwrap();
    let item = menu_item::create(
        state.pool(),
        &NewMenuItem {
            name: "Margherita".to_string(),
            description: Some("Tomato, mozzarella, basil".to_string()),
            price_cents: 1299,
            category: "pizza".to_string(),
            image_url: None,
            is_available: true,
            spice_level: Some(0),
        },
    )
    .await
    .unwrap();

    TestApp {
        _dir: dir,
        app: comanda_server::api::build_router(state, socket_layer),
        menu_item_id: item.id,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

fn place_body(menu_item_id: i64) -> Value {
    json!({
        "customerSessionId": "session-abc",
        "tableNumber": 5,
        "paymentMethod": "cash",
        "items": [{"menuItemId": menu_item_id, "quantity": 2}]
    })
}

#[tokio::test]
async fn full_order_flow_through_the_api() {
    let t = spawn_app().await;
    let manager_token = login(&t.app, "manager", "manager123").await;
    let kitchen_token = login(&t.app, "kitchen", "kitchen123").await;

    // The menu is public
    let (status, body) = send(&t.app, "GET", "/menu?available=true", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Place: 2 × 12.99 at 8% tax
    let (status, body) = send(&t.app, "POST", "/orders", None, Some(place_body(t.menu_item_id))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["code"], "E0000");
    let order = &body["data"];
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["status"], "pending_approval");
    assert!(order.get("kitchen_status").is_none());
    assert_eq!(order["subtotal"].as_str().unwrap().parse::<Decimal>().unwrap(), "25.98".parse().unwrap());
    assert_eq!(order["tax"].as_str().unwrap().parse::<Decimal>().unwrap(), "2.08".parse().unwrap());
    assert_eq!(order["total"].as_str().unwrap().parse::<Decimal>().unwrap(), "28.06".parse().unwrap());
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));

    // Customers can read their order back
    let (status, body) = send(&t.app, "GET", &format!("/orders/{order_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64().unwrap(), order_id);
    let (status, body) = send(&t.app, "GET", "/orders/session/session-abc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Manager routes are gated
    let (status, _) = send(&t.app, "GET", "/manager/orders/pending", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&t.app, "GET", "/manager/orders/pending", Some(&kitchen_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&t.app, "GET", "/manager/orders/pending", Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Approve with a 20 minute window
    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/manager/orders/{order_id}/approve"),
        Some(&manager_token),
        Some(json!({"expected_minutes": 20})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["kitchen_status"], "pending");
    assert!(body["data"]["expected_completion_at"].is_string());

    // A second approval is a stale transition
    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/manager/orders/{order_id}/approve"),
        Some(&manager_token),
        Some(json!({"expected_minutes": 20})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");

    // The kitchen board shows the order as pending
    let (status, body) = send(&t.app, "GET", "/kitchen/orders/active", Some(&kitchen_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pending"].as_array().unwrap().len(), 1);
    assert!(body["data"]["preparing"].as_array().unwrap().is_empty());

    // preparing → ready, in kitchen vocabulary
    for (code, expected) in [("preparing", "in_progress"), ("ready", "ready")] {
        let (status, body) = send(
            &t.app,
            "PUT",
            &format!("/kitchen/orders/{order_id}/status"),
            Some(&kitchen_token),
            Some(json!({"status_code": code})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], expected);
    }

    // Feedback opens at ready
    let feedback = json!({
        "orderId": order_id,
        "customerSessionId": "session-abc",
        "foodQuality": 4,
        "serviceSpeed": 4,
        "accuracy": 4,
        "valueForMoney": 4,
        "overall": 4,
        "comment": "Solid"
    });
    let (status, body) = send(&t.app, "POST", "/feedback", None, Some(feedback.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["average"].as_f64().unwrap(), 4.0);

    // One feedback per order
    let (status, body) = send(&t.app, "POST", "/feedback", None, Some(feedback)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // Close out
    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/kitchen/orders/{order_id}/status"),
        Some(&kitchen_token),
        Some(json!({"status_code": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");

    // Statistics reflect the completed order
    let (status, body) = send(&t.app, "GET", "/manager/statistics", Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orders_by_status"]["completed"].as_i64().unwrap(), 1);
    assert_eq!(body["data"]["orders_today"].as_i64().unwrap(), 1);
    assert_eq!(
        body["data"]["completed_revenue"].as_str().unwrap().parse::<Decimal>().unwrap(),
        "28.06".parse().unwrap()
    );
    assert_eq!(body["data"]["average_rating"].as_f64().unwrap(), 4.0);
}

#[tokio::test]
async fn placement_validation_failures() {
    let t = spawn_app().await;

    // Unknown table
    let mut body = place_body(t.menu_item_id);
    body["tableNumber"] = json!(99);
    let (status, response) = send(&t.app, "POST", "/orders", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "E0002");

    // Unknown menu item
    let mut body = place_body(t.menu_item_id);
    body["items"][0]["menuItemId"] = json!(9999);
    let (status, response) = send(&t.app, "POST", "/orders", None, Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["code"], "E0003");

    // Empty order
    let mut body = place_body(t.menu_item_id);
    body["items"] = json!([]);
    let (status, _) = send(&t.app, "POST", "/orders", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejection_and_customer_cancel() {
    let t = spawn_app().await;
    let manager_token = login(&t.app, "manager", "manager123").await;

    let (_, body) = send(&t.app, "POST", "/orders", None, Some(place_body(t.menu_item_id))).await;
    let first = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(&t.app, "POST", "/orders", None, Some(place_body(t.menu_item_id))).await;
    let second = body["data"]["id"].as_i64().unwrap();

    // Reject needs a reason
    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/manager/orders/{first}/reject"),
        Some(&manager_token),
        Some(json!({"reason": "Out of dough"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["rejection_reason"], "Out of dough");

    // Cancelling someone else's order is forbidden
    let (status, _) = send(
        &t.app,
        "PUT",
        &format!("/orders/{second}/cancel"),
        None,
        Some(json!({"customerSessionId": "not-mine"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/orders/{second}/cancel"),
        None,
        Some(json!({"customerSessionId": "session-abc", "reason": "Changed my mind"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "cancelled");
}

#[tokio::test]
async fn menu_crud_requires_manager() {
    let t = spawn_app().await;
    let manager_token = login(&t.app, "manager", "manager123").await;

    let new_item = json!({
        "name": "Tiramisu",
        "price": "6.50",
        "category": "dessert"
    });
    let (status, _) = send(&t.app, "POST", "/manager/menu", None, Some(new_item.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&t.app, "POST", "/manager/menu", Some(&manager_token), Some(new_item)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let item_id = body["data"]["id"].as_i64().unwrap();

    // Zero price is rejected
    let (status, _) = send(
        &t.app,
        "POST",
        "/manager/menu",
        Some(&manager_token),
        Some(json!({"name": "Free", "price": "0", "category": "dessert"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/manager/menu/{item_id}"),
        Some(&manager_token),
        Some(json!({"is_available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["is_available"], false);

    let (status, _) = send(
        &t.app,
        "DELETE",
        &format!("/manager/menu/{item_id}"),
        Some(&manager_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &t.app,
        "DELETE",
        &format!("/manager/menu/{item_id}"),
        Some(&manager_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let t = spawn_app().await;

    for uri in ["/health", "/health/detailed"] {
        let (status, body) = send(&t.app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["code"], "E0000");
    }
    let (status, _) = send(&t.app, "GET", "/health/readiness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&t.app, "GET", "/health/liveness", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let t = spawn_app().await;

    for (user, pass) in [("manager", "wrong"), ("ghost", "manager123")] {
        let (status, body) = send(
            &t.app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"username": user, "password": pass})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid username or password");
    }
}
