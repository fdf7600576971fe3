//! Staff repository

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::Staff;
use crate::utils::AppResult;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<Staff>> {
    let staff: Option<Staff> = sqlx::query_as("SELECT * FROM staff WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(staff)
}

pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: &str,
) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO staff (username, password_hash, role, is_active, created_at) \
         VALUES (?, ?, ?, 1, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}
