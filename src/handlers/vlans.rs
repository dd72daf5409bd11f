use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::models::*;
use crate::AppState;

// VLANs are created exclusively by the provisioning pipeline; the API
// exposes them read-only.

pub async fn list_vlans(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Vlan>>, ApiError> {
    let vlans = state.store.list_vlans().await?;
    Ok(Json(vlans))
}

pub async fn get_vlan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vlan>, ApiError> {
    let vlan = state
        .store
        .get_vlan(id)
        .await?
        .ok_or_else(|| ApiError::not_found("VLAN"))?;
    Ok(Json(vlan))
}

pub async fn list_terminations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<L2vpnTermination>>, ApiError> {
    let terminations = state.store.list_terminations().await?;
    Ok(Json(terminations))
}
