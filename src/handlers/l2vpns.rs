use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::AppState;

pub async fn list_l2vpns(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<L2vpn>>, ApiError> {
    let l2vpns = state.store.list_l2vpns().await?;
    Ok(Json(l2vpns))
}

pub async fn get_l2vpn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<L2vpn>, ApiError> {
    let l2vpn = state
        .store
        .get_l2vpn(id)
        .await?
        .ok_or_else(|| ApiError::not_found("L2VPN"))?;
    Ok(Json(l2vpn))
}

pub async fn create_l2vpn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateL2vpnRequest>,
) -> Result<(StatusCode, Json<L2vpn>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if req.identifier < 0 {
        return Err(ApiError::bad_request("identifier must be a non-negative integer"));
    }
    if let Some(tenant_id) = req.tenant_id {
        if state.store.get_tenant(tenant_id).await?.is_none() {
            return Err(ApiError::bad_request("tenant does not exist"));
        }
    }
    let l2vpn = state.store.create_l2vpn(&req).await?;
    Ok(created(l2vpn))
}

pub async fn update_l2vpn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateL2vpnRequest>,
) -> Result<Json<L2vpn>, ApiError> {
    if req.identifier < 0 {
        return Err(ApiError::bad_request("identifier must be a non-negative integer"));
    }
    let l2vpn = state.store.update_l2vpn(id, &req).await?;
    Ok(Json(l2vpn))
}

pub async fn delete_l2vpn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_l2vpn(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the VLAN terminations recorded for one L2VPN
pub async fn list_l2vpn_terminations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<L2vpnTermination>>, ApiError> {
    if state.store.get_l2vpn(id).await?.is_none() {
        return Err(ApiError::not_found("L2VPN"));
    }
    let terminations = state.store.list_terminations_by_l2vpn(id).await?;
    Ok(Json(terminations))
}
