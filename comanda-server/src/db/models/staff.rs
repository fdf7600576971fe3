//! Staff (manager / kitchen) credential model

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::utils::AppError;

/// Staff account row. The password hash never leaves this type.
#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    /// Hash a plaintext password with argon2id
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Verify a plaintext password against the stored hash
    pub fn verify_password(&self, password: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AppError::internal(format!("Corrupt password hash: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = Staff::hash_password("hunter2").unwrap();
        let staff = Staff {
            id: 1,
            username: "alice".to_string(),
            password_hash: hash,
            role: "manager".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        assert!(staff.verify_password("hunter2").unwrap());
        assert!(!staff.verify_password("wrong").unwrap());
    }
}
