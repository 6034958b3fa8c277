use axum::{
    Json,
    extract::{Query, State},
};
use bm_common::views::weekly::{WeeklyAtpSummary, weekly_atp_summary};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::load_bench;
use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    /// `YYYY-MM-DD`; the report covers the seven days ending that day.
    pub week: Option<String>,
}

fn parse_week(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("week must be YYYY-MM-DD, got {value}"))),
    }
}

pub async fn weekly_atp(
    State(state): State<SharedState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklyAtpSummary>, ApiError> {
    let reference = parse_week(query.week.as_deref())?;
    let now = Utc::now();
    let (resources, requirements) = load_bench(&state, now).await?;

    Ok(Json(weekly_atp_summary(
        &resources,
        &requirements,
        reference,
        now,
    )))
}
