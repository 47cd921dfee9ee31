//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use neurone_profile_core::ports::AuthVerdict;
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::{error::HandlerError, state::AppState};

pub const MISSING_TOKEN_MESSAGE: &str = "Missing bearer token";
pub const AUTH_FAILED_MESSAGE: &str = "Authentication with Neurone-Auth failed";

/// Extracts `<token>` from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Middleware that forwards the bearer token to the auth authority.
///
/// The wrapped handler runs only once the authority has granted the token.
/// A missing token, a denial and an unreachable authority all end the
/// request with 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, HandlerError> {
    if state.config.auth_disabled {
        return Ok(next.run(req).await);
    }

    // 1. Extract the token
    let token = bearer_token(req.headers()).ok_or_else(|| {
        warn!("Rejected {} {}: no bearer token", req.method(), req.uri().path());
        HandlerError::Unauthorized(MISSING_TOKEN_MESSAGE.to_string())
    })?
    .to_owned();

    // 2. Ask the authority, failing closed
    match state.authority.check_token(&token).await {
        Ok(AuthVerdict::Granted) => {}
        Ok(AuthVerdict::Denied(reason)) => {
            warn!("Auth authority denied token: {:?}", reason);
            return Err(HandlerError::Unauthorized(AUTH_FAILED_MESSAGE.to_string()));
        }
        Err(e) => {
            error!("Failed to check token with auth authority: {:?}", e);
            return Err(HandlerError::Unauthorized(AUTH_FAILED_MESSAGE.to_string()));
        }
    }

    // 3. Continue to the handler
    Ok(next.run(req).await)
}
