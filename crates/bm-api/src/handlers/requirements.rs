use axum::{
    Json,
    extract::{Path, Query, State},
};
use bm_common::Requirement;
use bm_common::views::requirements::search_requirements;
use chrono::Utc;
use serde::Deserialize;

use super::load_bench;
use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct RequirementQuery {
    pub search: Option<String>,
}

pub async fn list_requirements(
    State(state): State<SharedState>,
    Query(query): Query<RequirementQuery>,
) -> Result<Json<Vec<Requirement>>, ApiError> {
    let (_, requirements) = load_bench(&state, Utc::now()).await?;

    let requirements = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => search_requirements(&requirements, term)
            .into_iter()
            .cloned()
            .collect(),
        _ => requirements,
    };

    Ok(Json(requirements))
}

pub async fn get_requirement(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Requirement>, ApiError> {
    let (_, requirements) = load_bench(&state, Utc::now()).await?;

    requirements
        .into_iter()
        .find(|requirement| requirement.id == id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("requirement {id} not found")))
}
