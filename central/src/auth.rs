use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::models::ServiceCredentials;
use crate::AppState;
use wire::token;

/// Caller identity resolved by the Token Verifier, stashed in request
/// extensions for downstream handlers — the JWT-verifying analogue of the
/// teacher's `WorkerTokenHash` extension.
#[derive(Clone, Debug)]
pub struct CallerIdentity {
    pub service_name: String,
    pub role: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    if path == "/health" {
        return Ok(next.run(req).await);
    }
    if !state.config.require_auth {
        tracing::debug!("auth disabled (dev mode)");
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::AuthInvalidToken)?;

    let token_str = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::AuthInvalidToken)?;

    let issuer = token::peek_issuer(token_str).map_err(|_| AppError::AuthMissingIssuer)?;

    let service = sqlx::query_as::<_, ServiceCredentials>(
        "SELECT id, service_name, service_secret, role FROM service_credentials WHERE service_name = $1",
    )
    .bind(&issuer)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::AuthUnknownService)?;

    let algorithm = token::parse_algorithm(&state.config.jwt_algorithm);
    token::verify_token(token_str, state.config.jwt_secret.as_bytes(), algorithm).map_err(
        |err| match err {
            token::TokenError::Expired => AppError::AuthExpired,
            _ => AppError::AuthInvalidToken,
        },
    )?;

    let mut req = req;
    req.extensions_mut().insert(CallerIdentity {
        service_name: service.service_name,
        role: service.role,
    });

    Ok(next.run(req).await)
}
