//! Comanda Server - restaurant ordering backend
//!
//! Customers browse the menu and place orders; managers approve or reject
//! them; the kitchen walks approved orders through preparation; everyone
//! watches the same lifecycle over Socket.IO rooms.
//!
//! # Module structure
//!
//! ```text
//! comanda-server/src/
//! ├── core/       # config, shared state, HTTP server
//! ├── auth/       # JWT service, staff roles, route middleware
//! ├── api/        # REST routes and handlers
//! ├── db/         # SQLite pool, schema, models, repositories
//! ├── orders/     # money arithmetic and the order lifecycle service
//! ├── realtime/   # Socket.IO hub and connection handlers
//! └── utils/      # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod realtime;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use realtime::RealtimeHub;
pub use utils::logger::init_logger;
pub use utils::{AppError, AppResponse, AppResult};

/// Load .env, then bring up logging from the resulting environment
pub fn setup_environment() -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // A missing .env file is fine; the environment may be set directly
    let _ = dotenv::dotenv();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());

    init_logger(&level, json, log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
   ______                                 __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
