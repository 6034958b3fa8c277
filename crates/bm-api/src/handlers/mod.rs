pub mod accounts;
pub mod dashboard;
pub mod health;
pub mod interviews;
pub mod matches;
pub mod pagination;
pub mod requirements;
pub mod resources;
pub mod soft_blocks;
pub mod weekly;

use bm_common::views::requirements::{DeriveOptions, derive_requirements};
use bm_common::{Requirement, Resource};
use chrono::{DateTime, Utc};

use crate::AppState;
use crate::error::ApiError;

/// Resources and the requirements derived from them, read in one upstream call.
pub(crate) async fn load_bench(
    state: &AppState,
    now: DateTime<Utc>,
) -> Result<(Vec<Resource>, Vec<Requirement>), ApiError> {
    let resources = state.source.resources(now).await?;
    let options = DeriveOptions {
        synthesize_fallback: state.config.synthesize_requirements,
    };
    let requirements = derive_requirements(&resources, options, now);
    Ok((resources, requirements))
}
