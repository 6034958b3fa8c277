use serde::Deserialize;

use crate::error::ApiError;

const DEFAULT_PER_PAGE: usize = 10;
const MAX_PER_PAGE: usize = 200;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// 1-based page and page size, with defaults applied.
pub fn validate_pagination(params: PageParams) -> Result<(usize, usize), ApiError> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);

    if page == 0 {
        return Err(ApiError::BadRequest("page must be at least 1".into()));
    }

    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ApiError::BadRequest(format!(
            "per_page must be between 1 and {MAX_PER_PAGE}"
        )));
    }

    Ok((page, per_page))
}
