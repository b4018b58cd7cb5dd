//! Static form metadata: countries, departments, skills, job titles.
//!
//! Each handler waits a little before answering so dependent dropdowns
//! exercise their loading states.

use axum::{
    extract::State,
    Json,
};
use complex_forms_common::catalog::{self, JobTitleQuery, SkillQuery};
use complex_forms_common::{Country, Department, JobTitle, Page, Region, Skill, Team};
use std::sync::Arc;

use crate::extract::{Path, Query};
use crate::server::AppState;

const COUNTRIES_DELAY_MS: u64 = 300;
const STATES_DELAY_MS: u64 = 500;
const DEPARTMENTS_DELAY_MS: u64 = 400;
const TEAMS_DELAY_MS: u64 = 600;
const SKILLS_DELAY_MS: u64 = 700;
const JOB_TITLES_DELAY_MS: u64 = 800;

pub async fn countries(State(state): State<Arc<AppState>>) -> Json<&'static [Country]> {
    state.latency(COUNTRIES_DELAY_MS).await;
    Json(catalog::countries())
}

pub async fn states(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<String>,
) -> Json<&'static [Region]> {
    state.latency(STATES_DELAY_MS).await;
    Json(catalog::states(&country_id))
}

pub async fn departments(State(state): State<Arc<AppState>>) -> Json<&'static [Department]> {
    state.latency(DEPARTMENTS_DELAY_MS).await;
    Json(catalog::departments())
}

pub async fn teams(
    State(state): State<Arc<AppState>>,
    Path(department_id): Path<String>,
) -> Json<&'static [Team]> {
    state.latency(TEAMS_DELAY_MS).await;
    Json(catalog::teams(&department_id))
}

pub async fn skills(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SkillQuery>,
) -> Json<Page<Skill>> {
    state.latency(SKILLS_DELAY_MS).await;
    Json(catalog::search_skills(&query))
}

pub async fn job_titles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobTitleQuery>,
) -> Json<Page<JobTitle>> {
    state.latency(JOB_TITLES_DELAY_MS).await;
    Json(catalog::search_job_titles(&query))
}
