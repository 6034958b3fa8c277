use axum::{Json, extract::State};
use bm_common::views::dashboard::{DashboardSummary, dashboard_summary};
use chrono::Utc;
use tracing::warn;

use crate::SharedState;
use crate::error::ApiError;

pub async fn dashboard(
    State(state): State<SharedState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let now = Utc::now();
    let resources = state.source.resources(now).await?;

    let upstream = state
        .source
        .statistics()
        .await
        .inspect_err(|err| warn!(error = %err, "upstream statistics unavailable"))
        .ok();

    Ok(Json(dashboard_summary(&resources, upstream.as_ref(), now)))
}
