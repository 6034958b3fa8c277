use axum::{
    Json,
    extract::{Query, State},
};
use bm_common::MatchRecommendation;
use bm_common::matching::finder::MatchFilter;
use bm_common::matching::find_matches;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::load_bench;
use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    pub requirement_id: Option<String>,
    pub location: Option<String>,
}

impl From<MatchQuery> for MatchFilter {
    fn from(query: MatchQuery) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        MatchFilter {
            requirement_id: non_empty(query.requirement_id),
            location: non_empty(query.location),
        }
    }
}

pub async fn list_matches(
    State(state): State<SharedState>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<Vec<MatchRecommendation>>, ApiError> {
    let (resources, requirements) = load_bench(&state, Utc::now()).await?;
    let filter = MatchFilter::from(query);

    if let Some(id) = filter.requirement_id.as_deref() {
        if !requirements.iter().any(|requirement| requirement.id == id) {
            return Err(ApiError::NotFound(format!("requirement {id} not found")));
        }
    }

    let matches = filter.apply(find_matches(&resources, &requirements));
    debug!(
        resources = resources.len(),
        requirements = requirements.len(),
        matches = matches.len(),
        "matches served"
    );

    Ok(Json(matches))
}
