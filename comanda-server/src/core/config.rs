//! Server configuration
//!
//! Every setting can be overridden through an environment variable:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATABASE_URL | sqlite://comanda.db | SQLite database location |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | TAX_RATE | 0.08 | Sales tax rate applied at order placement |
//! | TABLE_COUNT | 22 | Dining tables seeded as 1..=N |
//! | DEV_AUTH_FALLBACK | false | Grant a fallback manager principal to tokenless requests (never in production) |
//! | LOG_LEVEL | info | Default tracing filter |
//! | LOG_JSON | false | JSON console logs instead of compact |
//! | LOG_DIR | (unset) | Directory for daily rolling log files |
//! | MANAGER_USERNAME / MANAGER_PASSWORD | manager / manager123 | Seeded manager account |
//! | KITCHEN_USERNAME / KITCHEN_PASSWORD | kitchen / kitchen123 | Seeded kitchen account |
//!
//! JWT settings (`JWT_SECRET` and friends) are read by [`JwtConfig`].

use rust_decimal::Decimal;

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// JWT settings
    pub jwt: JwtConfig,
    /// Sales tax rate, e.g. 0.08
    pub tax_rate: Decimal,
    /// Number of seeded dining tables (valid table numbers are 1..=N)
    pub table_count: i64,
    /// Dev-only: requests without a token get a fallback manager principal
    pub dev_auth_fallback: bool,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// JSON console output
    pub log_json: bool,
    /// Directory for rolling file logs; `None` disables file logging
    pub log_dir: Option<String>,
    /// Seeded manager account
    pub manager_username: String,
    pub manager_password: String,
    /// Seeded kitchen account
    pub kitchen_username: String,
    pub kitchen_password: String,
}

impl Config {
    /// Load configuration from the environment, with defaults
    pub fn from_env() -> Self {
        Self {
            http_port: env_parsed("HTTP_PORT", 3000),
            database_url: env_or("DATABASE_URL", "sqlite://comanda.db"),
            environment: env_or("ENVIRONMENT", "development"),
            jwt: JwtConfig::default(),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Decimal::new(8, 2)),
            table_count: env_parsed("TABLE_COUNT", 22),
            dev_auth_fallback: env_parsed("DEV_AUTH_FALLBACK", false),
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parsed("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            manager_username: env_or("MANAGER_USERNAME", "manager"),
            manager_password: env_or("MANAGER_PASSWORD", "manager123"),
            kitchen_username: env_or("KITCHEN_USERNAME", "kitchen"),
            kitchen_password: env_or("KITCHEN_PASSWORD", "kitchen123"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_safe() {
        // Avoid touching the process environment; defaults only
        let config = Config {
            http_port: 3000,
            database_url: "sqlite://comanda.db".into(),
            environment: "development".into(),
            jwt: JwtConfig::default(),
            tax_rate: Decimal::new(8, 2),
            table_count: 22,
            dev_auth_fallback: false,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            manager_username: "manager".into(),
            manager_password: "manager123".into(),
            kitchen_username: "kitchen".into(),
            kitchen_password: "kitchen123".into(),
        };
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(!config.dev_auth_fallback);
        assert_eq!(config.tax_rate.to_string(), "0.08");
    }
}
