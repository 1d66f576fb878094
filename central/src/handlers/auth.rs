use axum::{extract::State, Json};
use wire::dto::{TokenRequest, TokenResponse};
use wire::token;

use crate::errors::{AppError, AppResult};
use crate::models::ServiceCredentials;
use crate::AppState;

/// `POST /auth/token` — Token Issuer (4.A).
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let service = sqlx::query_as::<_, ServiceCredentials>(
        "SELECT id, service_name, service_secret, role FROM service_credentials
         WHERE service_name = $1 AND service_secret = $2",
    )
    .bind(&payload.service_name)
    .bind(&payload.service_secret)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::AuthInvalidCredentials)?;

    let algorithm = token::parse_algorithm(&state.config.jwt_algorithm);
    let access_token = token::issue_token(
        &service.service_name,
        &service.role,
        state.config.jwt_secret.as_bytes(),
        algorithm,
        state.config.jwt_expiration_minutes,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(TokenResponse::bearer(access_token)))
}
