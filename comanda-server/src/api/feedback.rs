//! Customer feedback submission

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::Feedback;
use crate::orders::SubmitFeedback;
use crate::utils::{AppResponse, AppResult, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().route("/feedback", post(submit_feedback))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    order_id: i64,
    customer_session_id: String,
    food_quality: i64,
    service_speed: i64,
    accuracy: i64,
    value_for_money: i64,
    overall: i64,
    comment: Option<String>,
}

async fn submit_feedback(
    State(state): State<ServerState>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<Feedback>>)> {
    let feedback = state
        .orders()
        .submit_feedback(SubmitFeedback {
            order_id: request.order_id,
            customer_session_id: request.customer_session_id,
            food_quality: request.food_quality,
            service_speed: request.service_speed,
            accuracy: request.accuracy,
            value_for_money: request.value_for_money,
            overall: request.overall,
            comment: request.comment,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(feedback, "Thanks for the feedback"),
    ))
}
