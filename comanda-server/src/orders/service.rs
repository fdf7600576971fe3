//! Order lifecycle service
//!
//! Every transition is a conditional UPDATE in the repository; when it
//! affects zero rows the service re-reads the current status to decide
//! between not-found and invalid-transition. Broadcasts happen after the
//! database commit and are best-effort.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use shared::realtime::{NewOrder as NewOrderEvent, OrderApproved, OrderRejected, OrderUpdate};
use shared::{KitchenStatus, OrderStatus, PaymentMethod};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{Feedback, Order};
use crate::db::repository::{self, feedback::NewFeedback, order::NewOrderItem};
use crate::orders::money;
use crate::realtime::RealtimeHub;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SESSION_ID_LEN, validate_optional_text, validate_rating,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Most line items a single order may carry
const MAX_ORDER_ITEMS: usize = 50;
/// Quantity cap per line item
const MAX_ITEM_QUANTITY: i64 = 50;
/// Expected-completion window, in minutes
const COMPLETION_MINUTES: std::ops::RangeInclusive<i64> = 1..=240;

/// A customer's request to place an order (already deserialized)
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer_session_id: String,
    pub table_number: Option<i64>,
    pub payment_method: PaymentMethod,
    pub special_instructions: Option<String>,
    pub items: Vec<OrderLine>,
}

/// One requested line item
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub menu_item_id: i64,
    pub quantity: i64,
    pub special_instructions: Option<String>,
}

/// A customer's feedback submission
#[derive(Debug, Clone)]
pub struct SubmitFeedback {
    pub order_id: i64,
    pub customer_session_id: String,
    pub food_quality: i64,
    pub service_speed: i64,
    pub accuracy: i64,
    pub value_for_money: i64,
    pub overall: i64,
    pub comment: Option<String>,
}

/// The single write path for order state
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    hub: RealtimeHub,
    tax_rate: Decimal,
}

impl OrderService {
    pub fn new(pool: SqlitePool, hub: RealtimeHub, tax_rate: Decimal) -> Self {
        Self {
            pool,
            hub,
            tax_rate,
        }
    }

    /// Place a new order in `pending_approval` and notify the managers room
    pub async fn place(&self, request: PlaceOrder) -> AppResult<Order> {
        validate_required_text(
            &request.customer_session_id,
            "customerSessionId",
            MAX_SESSION_ID_LEN,
        )?;
        validate_optional_text(
            request.special_instructions.as_deref(),
            "specialInstructions",
            MAX_NOTE_LEN,
        )?;
        if request.items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }
        if request.items.len() > MAX_ORDER_ITEMS {
            return Err(AppError::validation(format!(
                "Order may contain at most {MAX_ORDER_ITEMS} items"
            )));
        }
        for line in &request.items {
            if !(1..=MAX_ITEM_QUANTITY).contains(&line.quantity) {
                return Err(AppError::validation(format!(
                    "Quantity must be between 1 and {MAX_ITEM_QUANTITY}"
                )));
            }
            validate_optional_text(
                line.special_instructions.as_deref(),
                "item specialInstructions",
                MAX_NOTE_LEN,
            )?;
        }

        // Table numbers must match a seeded dining table
        if let Some(table_number) = request.table_number {
            if repository::dining_table::find_by_number(&self.pool, table_number)
                .await?
                .is_none()
            {
                return Err(AppError::validation(format!(
                    "Unknown table number: {table_number}"
                )));
            }
        }

        // Resolve menu items and capture their current prices
        let ids: Vec<i64> = request.items.iter().map(|l| l.menu_item_id).collect();
        let menu_items = repository::menu_item::find_by_ids(&self.pool, &ids).await?;

        let mut items = Vec::with_capacity(request.items.len());
        let mut priced_lines = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let item = menu_items
                .iter()
                .find(|m| m.id == line.menu_item_id)
                .ok_or_else(|| {
                    AppError::not_found(format!("Menu item {} not found", line.menu_item_id))
                })?;
            if !item.is_available {
                return Err(AppError::validation(format!(
                    "Menu item '{}' is not available",
                    item.name
                )));
            }
            priced_lines.push((item.price, line.quantity));
            items.push(NewOrderItem {
                menu_item_id: item.id,
                name: item.name.clone(),
                quantity: line.quantity,
                unit_price_cents: money::to_cents(item.price),
                special_instructions: line.special_instructions.clone(),
            });
        }

        let totals = money::order_totals(priced_lines, self.tax_rate);
        let order_number = generate_order_number();

        let order_id = repository::order::insert(
            &self.pool,
            &repository::order::NewOrder {
                order_number,
                customer_session_id: request.customer_session_id,
                table_number: request.table_number,
                payment_method: request.payment_method.as_str(),
                special_instructions: request.special_instructions,
                subtotal_cents: money::to_cents(totals.subtotal),
                tax_cents: money::to_cents(totals.tax),
                total_cents: money::to_cents(totals.total),
                items,
            },
        )
        .await?;

        let order = self.fetch(order_id).await?;
        info!(
            order_id,
            order_number = %order.order_number,
            total = %order.total,
            "Order placed"
        );

        self.hub.notify_new_order(&NewOrderEvent {
            order_id,
            order_number: order.order_number.clone(),
            table_number: order.table_number,
            total: order.total,
            timestamp: order.created_at,
        });
        Ok(order)
    }

    /// pending_approval → approved, with an expected-completion window
    pub async fn approve(&self, order_id: i64, minutes: i64) -> AppResult<Order> {
        if !COMPLETION_MINUTES.contains(&minutes) {
            return Err(AppError::validation(format!(
                "Expected completion must be between {} and {} minutes",
                COMPLETION_MINUTES.start(),
                COMPLETION_MINUTES.end()
            )));
        }
        let approved_at = Utc::now();
        let expected_completion_at = approved_at + Duration::minutes(minutes);

        let applied = repository::order::approve_pending(
            &self.pool,
            order_id,
            approved_at,
            expected_completion_at,
        )
        .await?;
        if !applied {
            return Err(self.transition_failure(order_id, "approve").await);
        }

        let order = self.fetch(order_id).await?;
        info!(order_id, minutes, "Order approved");

        let rooms = OrderUpdate::interested_rooms(order_id, &order.customer_session_id);
        self.hub.notify_approved(
            &rooms,
            &OrderApproved {
                order_id,
                expected_completion_at,
            },
        );
        self.hub.notify_update(
            &rooms,
            &OrderUpdate::for_transition(
                order_id,
                OrderStatus::Approved,
                "Your order has been approved",
            ),
        );
        Ok(order)
    }

    /// pending_approval → cancelled, recording the manager's reason
    pub async fn reject(&self, order_id: i64, reason: &str) -> AppResult<Order> {
        validate_required_text(reason, "reason", MAX_NOTE_LEN)?;

        let applied = repository::order::reject_pending(&self.pool, order_id, reason).await?;
        if !applied {
            return Err(self.transition_failure(order_id, "reject").await);
        }

        let order = self.fetch(order_id).await?;
        info!(order_id, reason, "Order rejected");

        let rooms = OrderUpdate::interested_rooms(order_id, &order.customer_session_id);
        self.hub.notify_rejected(
            &rooms,
            &OrderRejected {
                order_id,
                reason: reason.to_string(),
            },
        );
        self.hub.notify_update(
            &rooms,
            &OrderUpdate::for_transition(
                order_id,
                OrderStatus::Cancelled,
                format!("Order rejected: {reason}"),
            ),
        );
        Ok(order)
    }

    /// Customer cancellation of their own order, from any non-terminal state
    pub async fn cancel(
        &self,
        order_id: i64,
        session_id: &str,
        reason: Option<&str>,
    ) -> AppResult<Order> {
        validate_optional_text(reason, "reason", MAX_NOTE_LEN)?;

        let order = self.fetch(order_id).await?;
        if order.customer_session_id != session_id {
            return Err(AppError::forbidden(
                "Order belongs to a different session".to_string(),
            ));
        }

        let applied = repository::order::cancel(&self.pool, order_id, reason).await?;
        if !applied {
            return Err(self.transition_failure(order_id, "cancel").await);
        }

        let order = self.fetch(order_id).await?;
        info!(order_id, "Order cancelled by customer");

        let rooms = OrderUpdate::interested_rooms(order_id, &order.customer_session_id);
        self.hub.notify_update(
            &rooms,
            &OrderUpdate::for_transition(order_id, OrderStatus::Cancelled, "Order cancelled"),
        );
        Ok(order)
    }

    /// Kitchen advance to `target`, translated onto the order machine.
    ///
    /// The kitchen names the stage it wants (`preparing`, `ready`,
    /// `completed`); the matching `approved → in_progress → ready →
    /// completed` edge is enforced by the conditional UPDATE.
    pub async fn advance_kitchen(
        &self,
        order_id: i64,
        target: KitchenStatus,
        notes: Option<&str>,
        expected_minutes: Option<i64>,
    ) -> AppResult<Order> {
        validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
        if let Some(minutes) = expected_minutes {
            if !COMPLETION_MINUTES.contains(&minutes) {
                return Err(AppError::validation(format!(
                    "Expected completion must be between {} and {} minutes",
                    COMPLETION_MINUTES.start(),
                    COMPLETION_MINUTES.end()
                )));
            }
        }

        let from = match target {
            KitchenStatus::Pending => {
                return Err(AppError::invalid_transition(
                    "Order is already in the kitchen queue".to_string(),
                ));
            }
            KitchenStatus::Preparing => OrderStatus::Approved,
            KitchenStatus::Ready => OrderStatus::InProgress,
            KitchenStatus::Completed => OrderStatus::Ready,
        };
        let to = target.order_status();
        let expected_completion_at = expected_minutes.map(|m| Utc::now() + Duration::minutes(m));

        let applied =
            repository::order::advance(&self.pool, order_id, from, to, notes, expected_completion_at)
                .await?;
        if !applied {
            return Err(self.transition_failure(order_id, "advance").await);
        }

        let order = self.fetch(order_id).await?;
        info!(order_id, status = %to, "Kitchen advanced order");

        let message = match to {
            OrderStatus::InProgress => "The kitchen has started preparing your order",
            OrderStatus::Ready => "Your order is ready for pickup",
            OrderStatus::Completed => "Your order is complete",
            _ => "Order updated",
        };
        let rooms = OrderUpdate::interested_rooms(order_id, &order.customer_session_id);
        self.hub
            .notify_update(&rooms, &OrderUpdate::for_transition(order_id, to, message));
        Ok(order)
    }

    /// One feedback submission per order, once the order is ready
    pub async fn submit_feedback(&self, request: SubmitFeedback) -> AppResult<Feedback> {
        validate_rating(request.food_quality, "foodQuality")?;
        validate_rating(request.service_speed, "serviceSpeed")?;
        validate_rating(request.accuracy, "accuracy")?;
        validate_rating(request.value_for_money, "valueForMoney")?;
        validate_rating(request.overall, "overall")?;
        validate_optional_text(request.comment.as_deref(), "comment", MAX_NOTE_LEN)?;

        let order = self.fetch(request.order_id).await?;
        if order.customer_session_id != request.customer_session_id {
            return Err(AppError::forbidden(
                "Order belongs to a different session".to_string(),
            ));
        }
        if !order.status.accepts_feedback() {
            return Err(AppError::not_eligible(format!(
                "Feedback opens once the order is ready (current status: {})",
                order.status
            )));
        }

        let feedback = repository::feedback::insert(
            &self.pool,
            &NewFeedback {
                order_id: request.order_id,
                food_quality: request.food_quality,
                service_speed: request.service_speed,
                accuracy: request.accuracy,
                value_for_money: request.value_for_money,
                overall: request.overall,
                comment: request.comment,
            },
        )
        .await?;
        info!(order_id = request.order_id, overall = request.overall, "Feedback recorded");
        Ok(feedback)
    }

    /// Load an order or fail with not-found
    pub async fn fetch(&self, order_id: i64) -> AppResult<Order> {
        repository::order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    /// Classify a transition whose conditional UPDATE hit zero rows
    async fn transition_failure(&self, order_id: i64, attempted: &str) -> AppError {
        match repository::order::current_status(&self.pool, order_id).await {
            Ok(Some(status)) => AppError::invalid_transition(format!(
                "Cannot {attempted} order {order_id} in status '{status}'"
            )),
            Ok(None) => AppError::not_found(format!("Order {order_id} not found")),
            Err(e) => e,
        }
    }
}

/// `ORD-YYYYMMDD-XXXXXXXX` with a random suffix, unique per placement
fn generate_order_number() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect::<String>()
        .to_uppercase();
    format!("ORD-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::{JwtConfig, JwtService};
    use crate::db::DbService;
    use crate::db::repository::menu_item::NewMenuItem;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: OrderService,
        menu_item_id: i64,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("orders-test.db").display());
        let db = DbService::new(&url).await.unwrap();
        repository::dining_table::seed_range(&db.pool, 22).await.unwrap();

        let item = repository::menu_item::create(
            &db.pool,
            &NewMenuItem {
                name: "Margherita".to_string(),
                description: None,
                price_cents: 1299,
                category: "pizza".to_string(),
                image_url: None,
                is_available: true,
                spice_level: None,
            },
        )
        .await
        .unwrap();

        let jwt = Arc::new(JwtService::new(JwtConfig::default()));
        let (hub, _layer) = RealtimeHub::new(jwt);
        let service = OrderService::new(db.pool.clone(), hub, "0.08".parse().unwrap());
        Fixture {
            _dir: dir,
            service,
            menu_item_id: item.id,
        }
    }

    fn place_request(menu_item_id: i64, quantity: i64) -> PlaceOrder {
        PlaceOrder {
            customer_session_id: "session-1".to_string(),
            table_number: Some(5),
            payment_method: PaymentMethod::Cash,
            special_instructions: None,
            items: vec![OrderLine {
                menu_item_id,
                quantity,
                special_instructions: None,
            }],
        }
    }

    #[tokio::test]
    async fn placing_an_order_prices_it_and_starts_pending() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 2))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::PendingApproval);
        assert_eq!(order.kitchen_status, None);
        assert_eq!(order.subtotal.to_string(), "25.98");
        assert_eq!(order.tax.to_string(), "2.08");
        assert_eq!(order.total.to_string(), "28.06");
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].line_total.to_string(), "25.98");
    }

    #[tokio::test]
    async fn placing_rejects_unknown_table() {
        let fx = fixture().await;
        let mut request = place_request(fx.menu_item_id, 1);
        request.table_number = Some(99);
        let err = fx.service.place(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[tokio::test]
    async fn placing_rejects_unavailable_items_and_empty_orders() {
        let fx = fixture().await;
        repository::menu_item::update(
            &fx.service.pool,
            fx.menu_item_id,
            repository::menu_item::MenuItemUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");

        let mut empty = place_request(fx.menu_item_id, 1);
        empty.items.clear();
        let err = fx.service.place(empty).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[tokio::test]
    async fn full_lifecycle_runs_through_the_kitchen() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 2))
            .await
            .unwrap();

        let order = fx.service.approve(order.id, 20).await.unwrap();
        assert_eq!(order.status, OrderStatus::Approved);
        assert_eq!(order.kitchen_status, Some(KitchenStatus::Pending));
        assert!(order.approved_at.is_some());
        assert!(order.expected_completion_at.is_some());

        let order = fx
            .service
            .advance_kitchen(order.id, KitchenStatus::Preparing, Some("extra basil"), None)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.kitchen_notes.as_deref(), Some("extra basil"));

        let order = fx
            .service
            .advance_kitchen(order.id, KitchenStatus::Ready, None, None)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Ready);

        let order = fx
            .service
            .advance_kitchen(order.id, KitchenStatus::Completed, None, None)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.completed_at.is_some());
    }

    #[tokio::test]
    async fn double_approval_fails_the_second_time() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap();

        fx.service.approve(order.id, 15).await.unwrap();
        let err = fx.service.approve(order.id, 15).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)), "{err}");
    }

    #[tokio::test]
    async fn kitchen_cannot_skip_stages() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap();
        fx.service.approve(order.id, 15).await.unwrap();

        // approved → ready skips preparing
        let err = fx
            .service
            .advance_kitchen(order.id, KitchenStatus::Ready, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)), "{err}");
    }

    #[tokio::test]
    async fn rejection_cancels_with_a_reason() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap();

        let order = fx
            .service
            .reject(order.id, "Out of dough")
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.rejection_reason.as_deref(), Some("Out of dough"));
    }

    #[tokio::test]
    async fn customers_cancel_only_their_own_orders() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap();

        let err = fx
            .service
            .cancel(order.id, "someone-else", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)), "{err}");

        let order = fx
            .service
            .cancel(order.id, "session-1", Some("Changed my mind"))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        // Already terminal
        let err = fx
            .service
            .cancel(order.id, "session-1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)), "{err}");
    }

    #[tokio::test]
    async fn feedback_waits_for_ready_and_is_once_per_order() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap();

        let submission = SubmitFeedback {
            order_id: order.id,
            customer_session_id: "session-1".to_string(),
            food_quality: 4,
            service_speed: 4,
            accuracy: 4,
            value_for_money: 4,
            overall: 4,
            comment: Some("Solid".to_string()),
        };

        let err = fx
            .service
            .submit_feedback(submission.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotEligible(_)), "{err}");

        fx.service.approve(order.id, 15).await.unwrap();
        fx.service
            .advance_kitchen(order.id, KitchenStatus::Preparing, None, None)
            .await
            .unwrap();
        fx.service
            .advance_kitchen(order.id, KitchenStatus::Ready, None, None)
            .await
            .unwrap();

        let feedback = fx
            .service
            .submit_feedback(submission.clone())
            .await
            .unwrap();
        assert_eq!(feedback.overall, 4);
        assert_eq!(feedback.average, 4.0);

        let err = fx.service.submit_feedback(submission).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)), "{err}");
    }

    #[tokio::test]
    async fn approval_window_is_bounded() {
        let fx = fixture().await;
        let order = fx
            .service
            .place(place_request(fx.menu_item_id, 1))
            .await
            .unwrap();

        for minutes in [0, 241] {
            let err = fx.service.approve(order.id, minutes).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{err}");
        }
    }
}
