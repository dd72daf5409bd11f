use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::AppState;

pub async fn list_vlan_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VlanGroup>>, ApiError> {
    let groups = state.store.list_vlan_groups().await?;
    Ok(Json(groups))
}

pub async fn get_vlan_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<VlanGroup>, ApiError> {
    let group = state
        .store
        .get_vlan_group(id)
        .await?
        .ok_or_else(|| ApiError::not_found("VLAN group"))?;
    Ok(Json(group))
}

pub async fn create_vlan_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVlanGroupRequest>,
) -> Result<(StatusCode, Json<VlanGroup>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if let Err(e) = crate::alloc::validate_ranges(&req.vid_ranges) {
        return Err(ApiError::bad_request(e));
    }
    let group = state.store.create_vlan_group(&req).await?;
    Ok(created(group))
}

pub async fn update_vlan_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateVlanGroupRequest>,
) -> Result<Json<VlanGroup>, ApiError> {
    if let Err(e) = crate::alloc::validate_ranges(&req.vid_ranges) {
        return Err(ApiError::bad_request(e));
    }
    let group = state.store.update_vlan_group(id, &req).await?;
    Ok(Json(group))
}

pub async fn delete_vlan_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_vlan_group(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the VLANs allocated within one group
pub async fn list_group_vlans(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Vlan>>, ApiError> {
    if state.store.get_vlan_group(id).await?.is_none() {
        return Err(ApiError::not_found("VLAN group"));
    }
    let vlans = state.store.list_vlans_by_group(id).await?;
    Ok(Json(vlans))
}
