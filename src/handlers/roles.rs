use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::AppState;

// ========== Device Roles ==========

pub async fn list_device_roles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeviceRole>>, ApiError> {
    let roles = state.store.list_device_roles().await?;
    Ok(Json(roles))
}

pub async fn get_device_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceRole>, ApiError> {
    let role = state
        .store
        .get_device_role(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Device role"))?;
    Ok(Json(role))
}

pub async fn create_device_role(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDeviceRoleRequest>,
) -> Result<(StatusCode, Json<DeviceRole>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let role = state.store.create_device_role(&req).await?;
    Ok(created(role))
}

pub async fn delete_device_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_device_role(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== VLAN Roles ==========

pub async fn list_vlan_roles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VlanRole>>, ApiError> {
    let roles = state.store.list_vlan_roles().await?;
    Ok(Json(roles))
}

pub async fn get_vlan_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<VlanRole>, ApiError> {
    let role = state
        .store
        .get_vlan_role(id)
        .await?
        .ok_or_else(|| ApiError::not_found("VLAN role"))?;
    Ok(Json(role))
}

pub async fn create_vlan_role(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVlanRoleRequest>,
) -> Result<(StatusCode, Json<VlanRole>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let role = state.store.create_vlan_role(&req).await?;
    Ok(created(role))
}

pub async fn delete_vlan_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_vlan_role(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
