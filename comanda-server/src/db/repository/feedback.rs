//! Feedback repository

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::{Feedback, FeedbackRow};
use crate::utils::{AppError, AppResult};

/// Fields for inserting feedback (ratings already validated)
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub order_id: i64,
    pub food_quality: i64,
    pub service_speed: i64,
    pub accuracy: i64,
    pub value_for_money: i64,
    pub overall: i64,
    pub comment: Option<String>,
}

pub async fn insert(pool: &SqlitePool, feedback: &NewFeedback) -> AppResult<Feedback> {
    let result = sqlx::query(
        "INSERT INTO feedback \
         (order_id, food_quality, service_speed, accuracy, value_for_money, overall, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(feedback.order_id)
    .bind(feedback.food_quality)
    .bind(feedback.service_speed)
    .bind(feedback.accuracy)
    .bind(feedback.value_for_money)
    .bind(feedback.overall)
    .bind(&feedback.comment)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| match &e {
        // UNIQUE(order_id) backs the one-feedback-per-order invariant
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::duplicate(format!(
            "Feedback already submitted for order {}",
            feedback.order_id
        )),
        _ => AppError::from(e),
    })?;

    let id = result.last_insert_rowid();
    let row: FeedbackRow = sqlx::query_as("SELECT * FROM feedback WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(Feedback::from(row))
}

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> AppResult<Option<Feedback>> {
    let row: Option<FeedbackRow> = sqlx::query_as("SELECT * FROM feedback WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Feedback::from))
}

/// Paginated listing, newest first, with the total row count
pub async fn page(pool: &SqlitePool, limit: i64, offset: i64) -> AppResult<(Vec<Feedback>, i64)> {
    let rows: Vec<FeedbackRow> =
        sqlx::query_as("SELECT * FROM feedback ORDER BY created_at DESC LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feedback")
        .fetch_one(pool)
        .await?;
    Ok((rows.into_iter().map(Feedback::from).collect(), total))
}

/// Mean of the `overall` rating across all feedback, if any exists
pub async fn average_overall(pool: &SqlitePool) -> AppResult<Option<f64>> {
    let (avg,): (Option<f64>,) = sqlx::query_as("SELECT AVG(overall) FROM feedback")
        .fetch_one(pool)
        .await?;
    Ok(avg)
}
