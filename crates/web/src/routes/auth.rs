//! Registration, login and current-user handlers

use axum::{extract::State, Extension, Json};
use complex_forms_common::{password, NewUser, PublicUser};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::payload::Payload;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: RegisterRequest = payload.parse()?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }
    if state.store.find_user_by_email(&req.email).is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let iterations = state.config.password_iterations;
    let plain = req.password;
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&plain, iterations))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    let user = state.store.create_user(NewUser {
        email: req.email,
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
    })?;
    info!("Registered user {} ({})", user.id, user.email);

    let token = state.issue_token(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: LoginRequest = payload.parse()?;
    let Some(user) = state.store.find_user_by_email(&req.email) else {
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.to_string()));
    };

    let stored = user.password_hash.clone();
    let plain = req.password;
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.issue_token(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Result<Json<PublicUser>, ApiError> {
    state
        .store
        .get_user(claims.id)
        .map(|u| Json(u.public()))
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}
