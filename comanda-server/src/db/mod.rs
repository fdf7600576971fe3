//! Database module
//!
//! Owns the SQLite connection pool, applies the embedded schema on boot and
//! seeds the fixed data (dining tables, staff accounts).

pub mod models;
pub mod repository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::info;

use crate::core::Config;
use crate::utils::AppError;

const SCHEMA: &str = include_str!("schema.sql");

/// Database service owning the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and foreign keys on
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { pool };
        service.apply_schema().await?;
        Ok(service)
    }

    /// Execute the embedded schema (idempotent `CREATE TABLE IF NOT EXISTS`)
    async fn apply_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Schema migration failed: {e}")))?;
        Ok(())
    }

    /// Seed the fixed dining table pool and the default staff accounts.
    ///
    /// Both seeds are no-ops when the tables already hold rows, so restarts
    /// never duplicate data.
    pub async fn seed(&self, config: &Config) -> Result<(), AppError> {
        let seeded = repository::dining_table::seed_range(&self.pool, config.table_count).await?;
        if seeded > 0 {
            info!(tables = seeded, "Seeded dining table pool");
        }

        if repository::staff::count(&self.pool).await? == 0 {
            let manager_hash = models::Staff::hash_password(&config.manager_password)?;
            repository::staff::insert(&self.pool, &config.manager_username, &manager_hash, "manager")
                .await?;
            let kitchen_hash = models::Staff::hash_password(&config.kitchen_password)?;
            repository::staff::insert(&self.pool, &config.kitchen_username, &kitchen_hash, "kitchen")
                .await?;
            info!(
                manager = %config.manager_username,
                kitchen = %config.kitchen_username,
                "Seeded default staff accounts"
            );
        }

        Ok(())
    }
}
