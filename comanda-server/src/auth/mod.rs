//! Authentication: JWT service, staff identity, route middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_kitchen, require_manager};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff role carried in the JWT `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Manager,
    Kitchen,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Kitchen => "kitchen",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "kitchen" => Ok(Self::Kitchen),
            _ => Err(()),
        }
    }
}

/// The authenticated principal, injected into request extensions by the
/// auth middleware.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: StaffRole,
}

impl CurrentUser {
    /// The named fallback principal used when `DEV_AUTH_FALLBACK` is on
    /// and a request arrives without a token. Never active in production.
    pub fn dev_fallback() -> Self {
        Self {
            id: "dev-fallback".to_string(),
            username: "dev-fallback".to_string(),
            role: StaffRole::Manager,
        }
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = ();

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role.parse()?,
        })
    }
}
