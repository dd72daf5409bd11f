use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::AppState;

// ========== Sites ==========

pub async fn list_sites(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Site>>, ApiError> {
    let sites = state.store.list_sites().await?;
    Ok(Json(sites))
}

pub async fn get_site(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Site>, ApiError> {
    let site = state
        .store
        .get_site(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Site"))?;
    Ok(Json(site))
}

pub async fn create_site(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let site = state.store.create_site(&req).await?;
    Ok(created(site))
}

pub async fn update_site(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<Json<Site>, ApiError> {
    let site = state.store.update_site(id, &req).await?;
    Ok(Json(site))
}

pub async fn delete_site(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_site(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Racks ==========

pub async fn list_racks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Rack>>, ApiError> {
    let racks = state.store.list_racks().await?;
    Ok(Json(racks))
}

pub async fn get_rack(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Rack>, ApiError> {
    let rack = state
        .store
        .get_rack(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Rack"))?;
    Ok(Json(rack))
}

pub async fn create_rack(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRackRequest>,
) -> Result<(StatusCode, Json<Rack>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if state.store.get_site(req.site_id).await?.is_none() {
        return Err(ApiError::bad_request("site does not exist"));
    }
    let rack = state.store.create_rack(&req).await?;
    Ok(created(rack))
}

pub async fn delete_rack(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_rack(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
