use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use wire::dto::ConflictBody;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid credentials")]
    AuthInvalidCredentials,
    #[error("missing issuer claim")]
    AuthMissingIssuer,
    #[error("unknown service")]
    AuthUnknownService,
    #[error("could not validate credentials")]
    AuthInvalidToken,
    #[error("could not validate credentials")]
    AuthExpired,

    #[error("{0}")]
    NotFound(String),

    #[error("optimistic lock failed")]
    Conflict(Box<ConflictBody>),

    #[error("insufficient quantity")]
    InsufficientQuantity(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::AuthInvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"detail": "Invalid credentials"})),
            )
                .into_response(),
            AppError::AuthMissingIssuer => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"detail": "Missing issuer claim"})),
            )
                .into_response(),
            AppError::AuthUnknownService => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"detail": "Unknown service"})),
            )
                .into_response(),
            AppError::AuthInvalidToken | AppError::AuthExpired => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"detail": "Could not validate credentials"})),
            )
                .into_response(),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(serde_json::json!({"detail": msg}))).into_response()
            }
            AppError::Conflict(body) => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({"detail": *body})),
            )
                .into_response(),
            AppError::InsufficientQuantity(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"detail": msg})),
            )
                .into_response(),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"detail": "Internal server error"})),
                )
                    .into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"detail": "Internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
