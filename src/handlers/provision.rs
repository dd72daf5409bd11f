use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{created, ApiError};
use crate::models::*;
use crate::provision;
use crate::AppState;

/// Run the VXLAN provisioning pipeline: allocate a VID, derive name and
/// VNI, create the VLAN, optionally attach a prefix, and record the L2VPN
/// termination. Returns the structured run report.
pub async fn provision_vxlan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProvisionRequest>,
) -> Result<(StatusCode, Json<ProvisionReport>), ApiError> {
    if req.mode == AllocationMode::Manual && req.manual_vid.is_none() {
        return Err(ApiError::bad_request(
            "manual allocation mode requires manual_vid",
        ));
    }
    if let Some(cidr) = req.prefix.as_deref() {
        if let Err(e) = crate::utils::parse_cidr(cidr) {
            return Err(ApiError::bad_request(e));
        }
    }

    let report = provision::run(&state.store, state.config.vlan_naming, &req).await?;
    Ok(created(report))
}
