//! Authentication middleware for Axum.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::jwt::Claims;
use crate::error::ApiError;
use crate::server::AppState;

/// Extension that holds the authenticated user's claims
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Bearer token from the `Authorization` header, if any.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid access token.
///
/// A missing token is 401; a token that fails validation is 403.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return ApiError::Unauthorized.into_response();
    };

    match state.signer.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser(claims));
            next.run(request).await
        }
        Err(e) => {
            debug!("Rejected access token: {}", e);
            ApiError::Forbidden.into_response()
        }
    }
}
