use crate::{
    AppState,
    dto::{SubscribeRequest, SubscribeResponse},
    errors::ApiError,
    services::{RejectReason, SubscribeOutcome},
};
use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;
use validator::Validate;

/// POST /subscribe
/// Body: { "email": "..." }
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>), ApiError> {
    if state.subscribe_limiter.check().is_err() {
        warn!("Subscription rate limit hit");
        return Err(ApiError::RateLimited);
    }

    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    match state.subscriptions.subscribe(&payload.email).await? {
        SubscribeOutcome::Accepted(_) => {
            Ok((StatusCode::CREATED, Json(SubscribeResponse::accepted())))
        }
        SubscribeOutcome::AcceptedLocally(_) => Ok((
            StatusCode::ACCEPTED,
            Json(SubscribeResponse::accepted_locally()),
        )),
        SubscribeOutcome::Rejected(RejectReason::Duplicate) => Err(ApiError::AlreadySubscribed),
        SubscribeOutcome::Rejected(RejectReason::InvalidEmail) => Err(ApiError::ValidationError(
            "Please enter a valid email address".to_string(),
        )),
    }
}
