use axum::{
    Json,
    extract::{Path, Query, State},
};
use bm_common::Resource;
use bm_common::client::{SkillSearch, SoftBlockRequest};
use bm_common::views::directory::{
    DirectoryFilter, Page, ResourceStatistics, distinct_locations, distinct_skills, paginate,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::pagination::{PageParams, validate_pagination};
use crate::SharedState;
use crate::error::ApiError;

pub async fn list_resources(
    State(state): State<SharedState>,
    Query(filter): Query<DirectoryFilter>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Resource>>, ApiError> {
    let (page, per_page) = validate_pagination(params)?;
    let resources = state.source.resources(Utc::now()).await?;

    let matching = resources
        .into_iter()
        .filter(|resource| filter.matches(resource))
        .collect::<Vec<_>>();

    Ok(Json(paginate(matching, page, per_page)))
}

pub async fn get_resource(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Resource>, ApiError> {
    let resource = state.source.resource(&id, Utc::now()).await?;
    Ok(Json(resource))
}

/// Counts computed from the directory, overridden by upstream totals when
/// upstream reports them.
pub async fn statistics(
    State(state): State<SharedState>,
) -> Result<Json<ResourceStatistics>, ApiError> {
    let resources = state.source.resources(Utc::now()).await?;
    let local = ResourceStatistics::from_resources(&resources);

    let merged = match state.source.statistics().await {
        Ok(upstream) => local.merge_upstream(&upstream),
        Err(err) => {
            warn!(error = %err, "upstream statistics unavailable; using local counts");
            local
        }
    };

    Ok(Json(merged))
}

pub async fn locations(State(state): State<SharedState>) -> Result<Json<Vec<String>>, ApiError> {
    let upstream = state.source.locations().await?;
    if !upstream.is_empty() {
        return Ok(Json(upstream));
    }

    let resources = state.source.resources(Utc::now()).await?;
    Ok(Json(distinct_locations(&resources)))
}

pub async fn skills(State(state): State<SharedState>) -> Result<Json<Vec<String>>, ApiError> {
    let upstream = state.source.skills().await?;
    if !upstream.is_empty() {
        return Ok(Json(upstream));
    }

    let resources = state.source.resources(Utc::now()).await?;
    Ok(Json(distinct_skills(&resources)))
}

#[derive(Debug, Deserialize)]
pub struct SkillSearchBody {
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Option<f64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SkillSearchBody {
    fn into_query(self) -> Result<SkillSearch, ApiError> {
        let skills = self
            .skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect::<Vec<_>>();

        if skills.is_empty() {
            return Err(ApiError::BadRequest("at least one skill is required".into()));
        }

        let defaults = SkillSearch::default();
        Ok(SkillSearch {
            skills,
            location: self.location.unwrap_or(defaults.location),
            experience: self.experience.unwrap_or(defaults.experience),
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        })
    }
}

pub async fn search_by_skills(
    State(state): State<SharedState>,
    Json(body): Json<SkillSearchBody>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let query = body.into_query()?;
    let resources = state.source.search_by_skills(&query, Utc::now()).await?;
    Ok(Json(resources))
}

pub async fn soft_block(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(request): Json<SoftBlockRequest>,
) -> Result<Json<Resource>, ApiError> {
    let now = Utc::now();

    if request.account_id.trim().is_empty() {
        return Err(ApiError::BadRequest("accountId is required".into()));
    }
    if request.blocked_until < now.date_naive() {
        return Err(ApiError::BadRequest("blockedUntil must not be in the past".into()));
    }

    let resource = state.source.soft_block(&id, &request, now).await?;
    info!(
        resource_id = %id,
        account_id = %request.account_id,
        blocked_until = %request.blocked_until,
        "soft block recorded"
    );

    Ok(Json(resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_body_trims_and_defaults() {
        let body: SkillSearchBody =
            serde_json::from_value(serde_json::json!({"skills": [" React ", ""]})).unwrap();
        let query = body.into_query().unwrap();

        assert_eq!(query.skills, vec!["React"]);
        assert_eq!(query.limit, 10);
        assert_eq!(query.page, 0);
        assert_eq!(query.location, "");
    }

    #[test]
    fn search_body_requires_a_skill() {
        let body: SkillSearchBody =
            serde_json::from_value(serde_json::json!({"skills": ["  "]})).unwrap();
        assert!(matches!(body.into_query(), Err(ApiError::BadRequest(_))));
    }
}
