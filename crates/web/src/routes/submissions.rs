//! Read-back of recorded submissions

use axum::{
    extract::State,
    Extension, Json,
};
use complex_forms_common::{Submission, SubmissionFilter};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::server::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(filter): Query<SubmissionFilter>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    Ok(Json(state.store.list_submissions(claims.id, &filter)?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, ApiError> {
    Ok(Json(state.store.get_submission(claims.id, &id)?))
}
