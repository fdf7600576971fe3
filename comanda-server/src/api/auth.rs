//! Staff login
//!
//! One endpoint for both roles; the role travels in the token, so the
//! manager and kitchen clients share the same login flow.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::ServerState;
use crate::db::repository::staff;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().route("/auth/login", post(login))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

#[derive(Debug, Serialize)]
struct LoginUser {
    id: i64,
    username: String,
    role: String,
}

async fn login(
    State(state): State<ServerState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    validate_required_text(&request.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&request.password, "password", MAX_PASSWORD_LEN)?;

    let staff = staff::find_by_username(state.pool(), &request.username)
        .await?
        .filter(|s| s.is_active);

    // Same error for unknown user and wrong password
    let Some(staff) = staff else {
        warn!(target: "security", username = %request.username, "Login failed: unknown user");
        return Err(AppError::invalid_credentials());
    };
    if !staff.verify_password(&request.password)? {
        warn!(target: "security", username = %request.username, "Login failed: bad password");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt
        .generate_token(&staff.id.to_string(), &staff.username, &staff.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    info!(username = %staff.username, role = %staff.role, "Staff logged in");
    Ok(ok_with_message(
        LoginResponse {
            token,
            user: LoginUser {
                id: staff.id,
                username: staff.username,
                role: staff.role,
            },
        },
        "Login successful",
    ))
}
