//! Workday-style option endpoints. All are POSTs carrying parent context.

use axum::{extract::State, Json};
use complex_forms_common::workday::{self, OptionsRequest};
use complex_forms_common::{LevelOption, NamedOption, Region, Team};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::payload::Payload;
use crate::server::AppState;

const WORKDAY_DELAY_MS: u64 = 300;

pub async fn states(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Json<&'static [Region]>, ApiError> {
    let req: OptionsRequest = payload.parse()?;
    debug!("Workday states for parent {:?}", req.parent_key());
    state.latency(WORKDAY_DELAY_MS).await;
    Ok(Json(workday::states_for(&req)))
}

pub async fn teams(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Json<&'static [Team]>, ApiError> {
    let req: OptionsRequest = payload.parse()?;
    debug!("Workday teams for parent {:?}", req.parent_key());
    state.latency(WORKDAY_DELAY_MS).await;
    Ok(Json(workday::teams_for(&req)))
}

pub async fn phone_codes(State(state): State<Arc<AppState>>) -> Json<&'static [NamedOption]> {
    state.latency(WORKDAY_DELAY_MS).await;
    Json(workday::phone_codes())
}

pub async fn phone_types(State(state): State<Arc<AppState>>) -> Json<&'static [NamedOption]> {
    state.latency(WORKDAY_DELAY_MS).await;
    Json(workday::phone_types())
}

pub async fn location_countries(State(state): State<Arc<AppState>>) -> Json<Vec<LevelOption>> {
    state.latency(WORKDAY_DELAY_MS).await;
    Json(workday::country_level_options())
}

pub async fn location_states(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Json<Vec<LevelOption>>, ApiError> {
    let req: OptionsRequest = payload.parse()?;
    debug!(
        "Workday level {} options for parent {:?}",
        req.level.unwrap_or(2),
        req.parent_key()
    );
    state.latency(WORKDAY_DELAY_MS).await;
    Ok(Json(workday::state_level_options(&req)))
}
