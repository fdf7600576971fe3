//! Concurrent transition race
//!
//! Two operators act on the same pending order at once; the conditional
//! UPDATE guarantees exactly one wins and the loser sees a stale-transition
//! error, never a silent double apply.

use comanda_server::auth::JwtConfig;
use comanda_server::db::repository::menu_item::{self, NewMenuItem};
use comanda_server::orders::{OrderLine, PlaceOrder};
use comanda_server::{AppError, Config, ServerState};
use shared::{OrderStatus, PaymentMethod};

async fn state_with_menu(dir: &tempfile::TempDir) -> (ServerState, i64) {
    let config = Config {
        http_port: 0,
        database_url: format!("sqlite://{}", dir.path().join("race-test.db").display()),
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
    let (state, _socket_layer) = ServerState::initialize(&config).await.unwrap();

    let item = menu_item::create(
        state.pool(),
        &NewMenuItem {
            name: "Carbonara".to_string(),
            description: None,
            price_cents: 1450,
            category: "pasta".to_string(),
            image_url: None,
            is_available: true,
            spice_level: None,
        },
    )
    .await
    .unwrap();
    (state, item.id)
}

async fn place_order(state: &ServerState, menu_item_id: i64) -> i64 {
    state
        .orders()
        .place(PlaceOrder {
            customer_session_id: "race-session".to_string(),
            table_number: None,
            payment_method: PaymentMethod::Card,
            special_instructions: None,
            items: vec![OrderLine {
                menu_item_id,
                quantity: 1,
                special_instructions: None,
            }],
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn approve_and_reject_race_has_exactly_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let (state, menu_item_id) = state_with_menu(&dir).await;
    let order_id = place_order(&state, menu_item_id).await;

    let approver = state.orders();
    let rejecter = state.orders();
    let (approved, rejected) = tokio::join!(
        approver.approve(order_id, 20),
        rejecter.reject(order_id, "No capacity"),
    );

    assert_ne!(
        approved.is_ok(),
        rejected.is_ok(),
        "exactly one transition must win"
    );
    let loser = if approved.is_ok() {
        rejected.unwrap_err()
    } else {
        approved.unwrap_err()
    };
    assert!(matches!(loser, AppError::InvalidTransition(_)), "{loser}");

    let order = state.orders().fetch(order_id).await.unwrap();
    match order.status {
        OrderStatus::Approved => assert!(order.rejection_reason.is_none()),
        OrderStatus::Cancelled => {
            assert_eq!(order.rejection_reason.as_deref(), Some("No capacity"))
        }
        other => panic!("unexpected status {other}"),
    }
}

#[tokio::test]
async fn double_approval_race_applies_once() {
    let dir = tempfile::tempdir().unwrap();
    let (state, menu_item_id) = state_with_menu(&dir).await;
    let order_id = place_order(&state, menu_item_id).await;

    let a = state.orders();
    let b = state.orders();
    let (first, second) = tokio::join!(a.approve(order_id, 15), b.approve(order_id, 30));

    assert_ne!(first.is_ok(), second.is_ok(), "one approval must lose");
    let order = state.orders().fetch(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Approved);
    assert!(order.expected_completion_at.is_some());
}
