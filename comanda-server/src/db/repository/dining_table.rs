//! Dining table repository

use sqlx::SqlitePool;

use crate::db::models::DiningTable;
use crate::utils::AppResult;

/// Insert tables 1..=count that do not exist yet. Returns rows inserted.
pub async fn seed_range(pool: &SqlitePool, count: i64) -> AppResult<u64> {
    let mut inserted = 0;
    for table_number in 1..=count {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO dining_tables (table_number, capacity, is_available) \
             VALUES (?, 4, 1)",
        )
        .bind(table_number)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<DiningTable>> {
    let tables: Vec<DiningTable> =
        sqlx::query_as("SELECT * FROM dining_tables ORDER BY table_number")
            .fetch_all(pool)
            .await?;
    Ok(tables)
}

pub async fn find_by_number(pool: &SqlitePool, table_number: i64) -> AppResult<Option<DiningTable>> {
    let table: Option<DiningTable> =
        sqlx::query_as("SELECT * FROM dining_tables WHERE table_number = ?")
            .bind(table_number)
            .fetch_optional(pool)
            .await?;
    Ok(table)
}
