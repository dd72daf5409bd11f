use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        // Provisioning
        .route("/api/provision/vxlan", post(handlers::provision::provision_vxlan))
        // Tenant group routes
        .route("/api/tenant-groups", get(handlers::tenants::list_tenant_groups))
        .route("/api/tenant-groups", post(handlers::tenants::create_tenant_group))
        .route("/api/tenant-groups/:id", get(handlers::tenants::get_tenant_group))
        .route("/api/tenant-groups/:id", put(handlers::tenants::update_tenant_group))
        .route("/api/tenant-groups/:id", delete(handlers::tenants::delete_tenant_group))
        // Tenant routes
        .route("/api/tenants", get(handlers::tenants::list_tenants))
        .route("/api/tenants", post(handlers::tenants::create_tenant))
        .route("/api/tenants/:id", get(handlers::tenants::get_tenant))
        .route("/api/tenants/:id", put(handlers::tenants::update_tenant))
        .route("/api/tenants/:id", delete(handlers::tenants::delete_tenant))
        // Site routes
        .route("/api/sites", get(handlers::sites::list_sites))
        .route("/api/sites", post(handlers::sites::create_site))
        .route("/api/sites/:id", get(handlers::sites::get_site))
        .route("/api/sites/:id", put(handlers::sites::update_site))
        .route("/api/sites/:id", delete(handlers::sites::delete_site))
        // Rack routes
        .route("/api/racks", get(handlers::sites::list_racks))
        .route("/api/racks", post(handlers::sites::create_rack))
        .route("/api/racks/:id", get(handlers::sites::get_rack))
        .route("/api/racks/:id", delete(handlers::sites::delete_rack))
        // Device role routes
        .route("/api/device-roles", get(handlers::roles::list_device_roles))
        .route("/api/device-roles", post(handlers::roles::create_device_role))
        .route("/api/device-roles/:id", get(handlers::roles::get_device_role))
        .route("/api/device-roles/:id", delete(handlers::roles::delete_device_role))
        // VLAN role routes
        .route("/api/vlan-roles", get(handlers::roles::list_vlan_roles))
        .route("/api/vlan-roles", post(handlers::roles::create_vlan_role))
        .route("/api/vlan-roles/:id", get(handlers::roles::get_vlan_role))
        .route("/api/vlan-roles/:id", delete(handlers::roles::delete_vlan_role))
        // VLAN group routes
        .route("/api/vlan-groups", get(handlers::vlan_groups::list_vlan_groups))
        .route("/api/vlan-groups", post(handlers::vlan_groups::create_vlan_group))
        .route("/api/vlan-groups/:id", get(handlers::vlan_groups::get_vlan_group))
        .route("/api/vlan-groups/:id", put(handlers::vlan_groups::update_vlan_group))
        .route("/api/vlan-groups/:id", delete(handlers::vlan_groups::delete_vlan_group))
        .route("/api/vlan-groups/:id/vlans", get(handlers::vlan_groups::list_group_vlans))
        // L2VPN routes
        .route("/api/l2vpns", get(handlers::l2vpns::list_l2vpns))
        .route("/api/l2vpns", post(handlers::l2vpns::create_l2vpn))
        .route("/api/l2vpns/:id", get(handlers::l2vpns::get_l2vpn))
        .route("/api/l2vpns/:id", put(handlers::l2vpns::update_l2vpn))
        .route("/api/l2vpns/:id", delete(handlers::l2vpns::delete_l2vpn))
        .route("/api/l2vpns/:id/terminations", get(handlers::l2vpns::list_l2vpn_terminations))
        // VLAN routes (read-only; created by provisioning)
        .route("/api/vlans", get(handlers::vlans::list_vlans))
        .route("/api/vlans/:id", get(handlers::vlans::get_vlan))
        .route("/api/terminations", get(handlers::vlans::list_terminations))
        // Prefix routes (read-only; created by provisioning)
        .route("/api/prefixes", get(handlers::prefixes::list_prefixes))
        .route("/api/prefixes/:id", get(handlers::prefixes::get_prefix))
        // Device routes
        .route("/api/devices", get(handlers::devices::list_devices))
        .route("/api/devices", post(handlers::devices::create_device))
        .route("/api/devices/:id", get(handlers::devices::get_device))
        .route("/api/devices/:id", delete(handlers::devices::delete_device))
        // Health
        .route("/api/health", get(handlers::healthcheck))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
