use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::AppState;

// ========== Tenant Groups ==========

pub async fn list_tenant_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TenantGroup>>, ApiError> {
    let groups = state.store.list_tenant_groups().await?;
    Ok(Json(groups))
}

pub async fn get_tenant_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TenantGroup>, ApiError> {
    let group = state
        .store
        .get_tenant_group(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant group"))?;
    Ok(Json(group))
}

pub async fn create_tenant_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTenantGroupRequest>,
) -> Result<(StatusCode, Json<TenantGroup>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let group = state.store.create_tenant_group(&req).await?;
    Ok(created(group))
}

pub async fn update_tenant_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateTenantGroupRequest>,
) -> Result<Json<TenantGroup>, ApiError> {
    let group = state.store.update_tenant_group(id, &req).await?;
    Ok(Json(group))
}

pub async fn delete_tenant_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_tenant_group(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Tenants ==========

pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Tenant>>, ApiError> {
    let tenants = state.store.list_tenants().await?;
    Ok(Json(tenants))
}

pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state
        .store
        .get_tenant(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant"))?;
    Ok(Json(tenant))
}

pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if let Some(group_id) = req.group_id {
        if state.store.get_tenant_group(group_id).await?.is_none() {
            return Err(ApiError::bad_request("tenant group does not exist"));
        }
    }
    let tenant = state.store.create_tenant(&req).await?;
    Ok(created(tenant))
}

pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateTenantRequest>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state.store.update_tenant(id, &req).await?;
    Ok(Json(tenant))
}

pub async fn delete_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_tenant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
