use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::naming::{self, DeviceNameParts};
use crate::AppState;

pub async fn list_devices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Device>>, ApiError> {
    let devices = state.store.list_devices().await?;
    Ok(Json(devices))
}

pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Device>, ApiError> {
    let device = state
        .store
        .get_device(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Device"))?;
    Ok(Json(device))
}

/// Create a device. When no name is supplied one is derived from the
/// tenancy/site/role hierarchy, disambiguated with a counter (or rack and
/// position for patch panels).
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let tenant = match req.tenant_id {
        Some(id) => Some(
            state
                .store
                .get_tenant(id)
                .await?
                .ok_or_else(|| ApiError::bad_request("tenant does not exist"))?,
        ),
        None => None,
    };
    let site = match req.site_id {
        Some(id) => Some(
            state
                .store
                .get_site(id)
                .await?
                .ok_or_else(|| ApiError::bad_request("site does not exist"))?,
        ),
        None => None,
    };
    let role = match req.role_id {
        Some(id) => Some(
            state
                .store
                .get_device_role(id)
                .await?
                .ok_or_else(|| ApiError::bad_request("device role does not exist"))?,
        ),
        None => None,
    };
    let rack = match req.rack_id {
        Some(id) => Some(
            state
                .store
                .get_rack(id)
                .await?
                .ok_or_else(|| ApiError::bad_request("rack does not exist"))?,
        ),
        None => None,
    };

    let name = match req.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => {
            if state.store.device_name_exists(name).await? {
                return Err(ApiError::conflict("device with this name already exists"));
            }
            name.to_string()
        }
        None => {
            let parts = DeviceNameParts {
                tenant_group_slug: tenant.as_ref().and_then(|t| t.group_slug.as_deref()),
                tenant_slug: tenant.as_ref().map(|t| t.slug.as_str()),
                site_slug: site.as_ref().map(|s| s.slug.as_str()),
                role_slug: role.as_ref().map(|r| r.slug.as_str()),
                rack_name: rack.as_ref().map(|r| r.name.as_str()),
                position: req.position,
            };
            naming::assign_device_name(&state.store, &parts).await?
        }
    };

    let device = state.store.create_device(&name, &req).await?;
    Ok(created(device))
}

pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_device(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
