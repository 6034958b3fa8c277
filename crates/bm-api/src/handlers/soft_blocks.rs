use axum::{
    Json,
    extract::{Query, State},
};
use bm_common::views::soft_blocks::{
    BlockFilter, BlockSummary, ResourceBlock, collect_soft_blocks, filter_blocks,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct BlockQuery {
    #[serde(default)]
    pub state: BlockFilter,
}

#[derive(Debug, Serialize)]
pub struct BlockList {
    pub items: Vec<ResourceBlock>,
    pub summary: BlockSummary,
}

pub async fn list_soft_blocks(
    State(state): State<SharedState>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<BlockList>, ApiError> {
    let now = Utc::now();
    let resources = state.source.resources(now).await?;

    let blocks = collect_soft_blocks(&resources);
    let summary = BlockSummary::from_blocks(&blocks, now);

    Ok(Json(BlockList {
        items: filter_blocks(blocks, query.state, now),
        summary,
    }))
}
