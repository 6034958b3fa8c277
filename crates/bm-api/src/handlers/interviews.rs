use axum::{
    Json,
    extract::{Query, State},
};
use bm_common::InterviewStatus;
use bm_common::views::interviews::{
    Interview, InterviewStats, derive_interviews, filter_by_status,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct InterviewQuery {
    pub status: Option<InterviewStatus>,
}

/// Stats always cover every interview, not just the filtered page.
#[derive(Debug, Serialize)]
pub struct InterviewList {
    pub items: Vec<Interview>,
    pub stats: InterviewStats,
}

pub async fn list_interviews(
    State(state): State<SharedState>,
    Query(query): Query<InterviewQuery>,
) -> Result<Json<InterviewList>, ApiError> {
    let now = Utc::now();
    let resources = state.source.resources(now).await?;

    let interviews = derive_interviews(&resources, now);
    let stats = InterviewStats::from_interviews(&interviews);

    Ok(Json(InterviewList {
        items: filter_by_status(interviews, query.status),
        stats,
    }))
}
