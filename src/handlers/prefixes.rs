use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::models::*;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PrefixQuery {
    #[serde(default)]
    pub cidr: Option<String>,
}

/// List prefixes, optionally filtered to an exact CIDR match
pub async fn list_prefixes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<Vec<Prefix>>, ApiError> {
    if let Some(cidr) = query.cidr.as_deref() {
        if let Err(e) = crate::utils::parse_cidr(cidr) {
            return Err(ApiError::bad_request(e));
        }
        let found = state.store.find_prefix_by_cidr(cidr).await?;
        return Ok(Json(found.into_iter().collect()));
    }
    let prefixes = state.store.list_prefixes().await?;
    Ok(Json(prefixes))
}

pub async fn get_prefix(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Prefix>, ApiError> {
    let prefix = state
        .store
        .get_prefix(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Prefix"))?;
    Ok(Json(prefix))
}
