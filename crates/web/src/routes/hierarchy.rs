//! Hierarchy trees behind the hierarchical dropdowns

use axum::{
    extract::State,
    Json,
};
use complex_forms_common::hierarchy::{self, Tree};
use complex_forms_common::{NodeView, Selection, TreeSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::extract::{Path, Query};
use crate::payload::Payload;
use crate::server::AppState;

const HIERARCHY_DELAY_MS: u64 = 300;
const DEFAULT_PLACEHOLDER: &str = "Select options...";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenQuery {
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Either a list of values or a single comma-separated string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Values {
    Many(Vec<String>),
    One(String),
}

impl Default for Values {
    fn default() -> Self {
        Values::Many(Vec::new())
    }
}

impl Values {
    fn into_vec(self) -> Vec<String> {
        match self {
            Values::Many(values) => values,
            Values::One(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest {
    #[serde(default)]
    selected: Values,
    #[serde(default)]
    full_path: Option<bool>,
    #[serde(default)]
    placeholder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedItem {
    pub id: String,
    pub label: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub selected: Vec<String>,
    pub items: Vec<ResolvedItem>,
    pub unknown: Vec<String>,
    pub display: String,
}

fn find_tree(key: &str) -> Result<&'static Tree, ApiError> {
    hierarchy::tree(key).ok_or_else(|| ApiError::NotFound(format!("Unknown hierarchy: {key}")))
}

pub async fn list() -> Json<Vec<TreeSummary>> {
    Json(hierarchy::trees().iter().map(Tree::summary).collect())
}

pub async fn children(
    State(state): State<Arc<AppState>>,
    Path(tree): Path<String>,
    Query(query): Query<ChildrenQuery>,
) -> Result<Json<Vec<NodeView>>, ApiError> {
    let tree = find_tree(&tree)?;
    state.latency(HIERARCHY_DELAY_MS).await;
    Ok(Json(tree.children(query.parent_id.as_deref())))
}

/// Normalise externally supplied values into a propagated selection.
pub async fn resolve(
    Path(tree): Path<String>,
    payload: Payload,
) -> Result<Json<ResolveResponse>, ApiError> {
    let tree = find_tree(&tree)?;
    let req: ResolveRequest = payload.parse()?;
    let (selection, unknown) = Selection::from_values(tree, &req.selected.into_vec());

    let items = selection
        .values()
        .iter()
        .filter_map(|id| tree.node(id))
        .map(|node| ResolvedItem {
            id: node.id.clone(),
            label: node.label.clone(),
            path: tree.full_path(&node.id),
        })
        .collect();
    let display = selection.display(
        tree,
        req.full_path.unwrap_or(true),
        req.placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER),
    );

    Ok(Json(ResolveResponse {
        selected: selection.values().to_vec(),
        items,
        unknown,
        display,
    }))
}
