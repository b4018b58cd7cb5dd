//! Form submission and multi-page session handlers

use axum::{extract::State, Extension, Json};
use complex_forms_common::{FormKind, MultiPageSession};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::Path;
use crate::payload::Payload;
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub submission_id: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    pub session_id: String,
    pub current_page: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSaved {
    pub success: bool,
    pub session_id: String,
    pub current_page: u32,
}

fn submit(
    state: &AppState,
    claims: &crate::auth::Claims,
    kind: FormKind,
    payload: Payload,
    message: &'static str,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submission = state
        .store
        .record_submission(claims.id, kind, payload.into_inner())?;
    info!(
        "Recorded {} submission {} for user {}",
        kind, submission.id, claims.id
    );
    Ok(Json(SubmitResponse {
        success: true,
        submission_id: submission.id,
        message,
    }))
}

pub async fn basic(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    payload: Payload,
) -> Result<Json<SubmitResponse>, ApiError> {
    submit(&state, &claims, FormKind::Basic, payload, "Form submitted successfully")
}

pub async fn complex(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    payload: Payload,
) -> Result<Json<SubmitResponse>, ApiError> {
    submit(
        &state,
        &claims,
        FormKind::Complex,
        payload,
        "Complex form submitted successfully",
    )
}

pub async fn workday(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    payload: Payload,
) -> Result<Json<SubmitResponse>, ApiError> {
    submit(
        &state,
        &claims,
        FormKind::Workday,
        payload,
        "Workday form submitted successfully",
    )
}

pub async fn start_multipage(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Result<Json<SessionStarted>, ApiError> {
    let session = state.store.start_session(claims.id)?;
    Ok(Json(SessionStarted {
        session_id: session.id,
        current_page: session.current_page,
    }))
}

pub async fn save_page(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path((session_id, page_number)): Path<(String, String)>,
    payload: Payload,
) -> Result<Json<PageSaved>, ApiError> {
    let page: u32 = page_number
        .parse()
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid page number: {page_number}")))?;

    let session = state
        .store
        .save_page(claims.id, &session_id, page, payload.into_inner())?;
    Ok(Json(PageSaved {
        success: true,
        session_id: session.id,
        current_page: session.current_page,
    }))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<MultiPageSession>, ApiError> {
    Ok(Json(state.store.get_session(claims.id, &session_id)?))
}

pub async fn submit_multipage(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submission = state.store.submit_session(claims.id, &session_id)?;
    info!("Multi-page session {} submitted by user {}", session_id, claims.id);
    Ok(Json(SubmitResponse {
        success: true,
        submission_id: submission.id,
        message: "Multi-page form submitted successfully",
    }))
}
