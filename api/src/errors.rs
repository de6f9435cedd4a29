use crate::services::SubscribeError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    AlreadySubscribed,
    RateLimited,
    ValidationError(String),
    InternalError(String),
}

/// Convert our custom errors to HTTP responses
///
/// `IntoResponse` trait: Axum calls this to convert errors to responses
/// This is how we control what users see when errors occur
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Post not found"),
            ApiError::AlreadySubscribed => {
                (StatusCode::CONFLICT, "This email is already subscribed")
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, please try again shortly",
            ),
            ApiError::ValidationError(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again later",
                )
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

impl From<SubscribeError> for ApiError {
    fn from(err: SubscribeError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
