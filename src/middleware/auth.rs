// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication middleware.

use crate::error::AppError;
use crate::services::{Claims, TokenError};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub claims: Claims,
}

/// Extract the credential from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingCredential)
}

/// Middleware that requires a valid session token.
///
/// Expired and forged tokens produce the same response.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let claims = state.tokens.verify(token).map_err(|e| {
        match e {
            TokenError::Expired => tracing::debug!("Rejected expired token"),
            TokenError::Invalid => tracing::warn!("Rejected invalid token"),
            TokenError::Signing(ref msg) => tracing::warn!(error = %msg, "Token check failed"),
        }
        AppError::InvalidToken
    })?;

    let auth_user = AuthUser {
        uid: claims.sub.clone(),
        claims,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
