use axum::{Json, extract::State};
use bm_common::client::Account;

use crate::SharedState;
use crate::error::ApiError;

pub async fn list_accounts(State(state): State<SharedState>) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.source.accounts().await?))
}
