//! Shared server state
//!
//! [`ServerState`] holds the handles every handler needs: config, database
//! pool, JWT service and the realtime hub. Cloning is shallow (`Arc` /
//! pool clones), so it is cheap to pass by value into axum.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use socketioxide::layer::SocketIoLayer;
use tracing::info;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::realtime::RealtimeHub;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt: Arc<JwtService>,
    pub hub: RealtimeHub,
    /// Process start, reported by the health endpoints
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    /// Open the database, seed fixed data and wire up the realtime hub.
    ///
    /// Returns the state together with the Socket.IO layer, which the
    /// router must mount exactly once.
    pub async fn initialize(config: &Config) -> AppResult<(Self, SocketIoLayer)> {
        let db = DbService::new(&config.database_url).await?;
        db.seed(config).await?;
        info!(database = %config.database_url, "Database ready");

        let jwt = Arc::new(JwtService::new(config.jwt.clone()));
        let (hub, socket_layer) = RealtimeHub::new(jwt.clone());

        let state = Self {
            config: config.clone(),
            db,
            jwt,
            hub,
            started_at: Utc::now(),
        };
        Ok((state, socket_layer))
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.db.pool
    }

    /// The order write path, bound to this state's pool and hub
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.pool.clone(), self.hub.clone(), self.config.tax_rate)
    }
}
