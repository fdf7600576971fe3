//! Feedback model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Raw feedback row
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub id: i64,
    pub order_id: i64,
    pub food_quality: i64,
    pub service_speed: i64,
    pub accuracy: i64,
    pub value_for_money: i64,
    pub overall: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// API-facing feedback with the computed average rating
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: i64,
    pub order_id: i64,
    pub food_quality: i64,
    pub service_speed: i64,
    pub accuracy: i64,
    pub value_for_money: i64,
    pub overall: i64,
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        let sum =
            row.food_quality + row.service_speed + row.accuracy + row.value_for_money + row.overall;
        Self {
            id: row.id,
            order_id: row.order_id,
            food_quality: row.food_quality,
            service_speed: row.service_speed,
            accuracy: row.accuracy,
            value_for_money: row.value_for_money,
            overall: row.overall,
            average: sum as f64 / 5.0,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_over_five_ratings() {
        let row = FeedbackRow {
            id: 1,
            order_id: 1,
            food_quality: 4,
            service_speed: 4,
            accuracy: 4,
            value_for_money: 4,
            overall: 4,
            comment: None,
            created_at: Utc::now(),
        };
        let feedback = Feedback::from(row);
        assert_eq!(feedback.average, 4.0);
    }
}
