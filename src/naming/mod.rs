//! Canonical name synthesis for VLANs and devices.
//!
//! Both naming policies share one shape: compose a hierarchy-derived base
//! token, then disambiguate with a suffix (zero-padded VID for VLANs,
//! numeric counter or rack/position for devices).

use anyhow::Result;

use crate::db::Store;
use crate::models::PATCH_PANEL_ROLE;
use crate::vni::VID_PAD;

/// Which scope token VLAN names carry. A deployment picks one convention
/// via config; it is never decided per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingConvention {
    /// `V_<GROUP>_<TENANT>_<vid>` — scoped by allocation domain + tenant.
    Domain,
    /// `V_<L2VPN>_<vid>` — scoped by the overlay gateway domain.
    Gateway,
}

impl std::str::FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(NamingConvention::Domain),
            "gateway" => Ok(NamingConvention::Gateway),
            other => Err(format!("unknown VLAN naming convention: {}", other)),
        }
    }
}

/// Segment placeholders for absent hierarchy attributes. A missing segment
/// must never collapse the hyphen-delimited structure.
pub const NO_TENANT: &str = "notenant";
pub const NO_TENANT_GROUP: &str = "notenantgroup";
pub const NO_SITE: &str = "nosite";
pub const NO_ROLE: &str = "norole";

/// Compose the canonical VLAN name for an allocation. Pure: identical
/// inputs always yield the identical name.
pub fn vlan_name(
    convention: NamingConvention,
    group_slug: &str,
    tenant_slug: Option<&str>,
    l2vpn_slug: &str,
    vid: u16,
) -> String {
    match convention {
        NamingConvention::Domain => format!(
            "V_{}_{}_{:0width$}",
            group_slug.to_uppercase(),
            tenant_slug.unwrap_or(NO_TENANT).to_uppercase(),
            vid,
            width = VID_PAD
        ),
        NamingConvention::Gateway => format!(
            "V_{}_{:0width$}",
            l2vpn_slug.to_uppercase(),
            vid,
            width = VID_PAD
        ),
    }
}

/// Hierarchy attributes a device name is derived from.
#[derive(Debug, Default)]
pub struct DeviceNameParts<'a> {
    pub tenant_group_slug: Option<&'a str>,
    pub tenant_slug: Option<&'a str>,
    pub site_slug: Option<&'a str>,
    pub role_slug: Option<&'a str>,
    pub rack_name: Option<&'a str>,
    pub position: Option<i64>,
}

/// Compose the hierarchical base token for a device name.
pub fn device_base_name(parts: &DeviceNameParts<'_>) -> String {
    format!(
        "{}-{}-{}-{}",
        parts.tenant_group_slug.unwrap_or(NO_TENANT_GROUP),
        parts.site_slug.unwrap_or(NO_SITE),
        parts.tenant_slug.unwrap_or(NO_TENANT),
        parts.role_slug.unwrap_or(NO_ROLE),
    )
}

/// Derive a free device name. Patch panels in a known rack slot are named
/// by physical position; everything else gets a two-digit counter probed
/// against the live store until a free name is found.
pub async fn assign_device_name(store: &Store, parts: &DeviceNameParts<'_>) -> Result<String> {
    let base = device_base_name(parts);

    if parts.role_slug == Some(PATCH_PANEL_ROLE) {
        if let (Some(rack), Some(position)) = (parts.rack_name, parts.position) {
            return Ok(format!("{}-{}-{}", base, rack, position));
        }
    }

    let mut number = 1u32;
    loop {
        let candidate = format!("{}-{:02}", base, number);
        if !store.device_name_exists(&candidate).await? {
            return Ok(candidate);
        }
        number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_name_domain_convention() {
        let name = vlan_name(
            NamingConvention::Domain,
            "core-fabric",
            Some("acme"),
            "gw-east",
            12,
        );
        assert_eq!(name, "V_CORE-FABRIC_ACME_0012");
    }

    #[test]
    fn test_vlan_name_domain_without_tenant() {
        let name = vlan_name(NamingConvention::Domain, "core-fabric", None, "gw-east", 7);
        assert_eq!(name, "V_CORE-FABRIC_NOTENANT_0007");
    }

    #[test]
    fn test_vlan_name_gateway_convention() {
        let name = vlan_name(
            NamingConvention::Gateway,
            "core-fabric",
            Some("acme"),
            "gw-east",
            12,
        );
        assert_eq!(name, "V_GW-EAST_0012");
    }

    #[test]
    fn test_vlan_name_is_idempotent() {
        let a = vlan_name(NamingConvention::Domain, "fab", Some("t1"), "gw", 42);
        let b = vlan_name(NamingConvention::Domain, "fab", Some("t1"), "gw", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_device_base_name_with_full_hierarchy() {
        let parts = DeviceNameParts {
            tenant_group_slug: Some("hosting"),
            tenant_slug: Some("acme"),
            site_slug: Some("dc1"),
            role_slug: Some("switch"),
            ..Default::default()
        };
        assert_eq!(device_base_name(&parts), "hosting-dc1-acme-switch");
    }

    #[test]
    fn test_device_base_name_placeholders() {
        let parts = DeviceNameParts::default();
        assert_eq!(
            device_base_name(&parts),
            "notenantgroup-nosite-notenant-norole"
        );
    }

    async fn test_store() -> Store {
        Store::with_pool_size(":memory:", 1)
            .await
            .expect("in-memory store")
    }

    fn empty_device_request() -> crate::models::CreateDeviceRequest {
        crate::models::CreateDeviceRequest {
            name: None,
            tenant_id: None,
            site_id: None,
            role_id: None,
            rack_id: None,
            position: None,
            status: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn first_namesake_gets_counter_01_then_02() {
        let store = test_store().await;
        let parts = DeviceNameParts {
            tenant_group_slug: Some("hosting"),
            tenant_slug: Some("acme"),
            site_slug: Some("dc1"),
            role_slug: Some("switch"),
            ..Default::default()
        };

        let first = assign_device_name(&store, &parts).await.unwrap();
        assert_eq!(first, "hosting-dc1-acme-switch-01");

        store
            .create_device(&first, &empty_device_request())
            .await
            .unwrap();

        let second = assign_device_name(&store, &parts).await.unwrap();
        assert_eq!(second, "hosting-dc1-acme-switch-02");
    }

    #[tokio::test]
    async fn patch_panel_is_named_by_rack_and_position() {
        let store = test_store().await;
        let parts = DeviceNameParts {
            tenant_group_slug: Some("hosting"),
            tenant_slug: Some("acme"),
            site_slug: Some("dc1"),
            role_slug: Some(PATCH_PANEL_ROLE),
            rack_name: Some("R1"),
            position: Some(3),
        };

        let name = assign_device_name(&store, &parts).await.unwrap();
        assert_eq!(name, "hosting-dc1-acme-patch-panel-R1-3");

        // Physical position substitutes for the counter even with a namesake
        store
            .create_device(&name, &empty_device_request())
            .await
            .unwrap();
        let again = assign_device_name(&store, &parts).await.unwrap();
        assert_eq!(again, name);
    }

    #[tokio::test]
    async fn patch_panel_without_rack_falls_back_to_counter() {
        let store = test_store().await;
        let parts = DeviceNameParts {
            role_slug: Some(PATCH_PANEL_ROLE),
            ..Default::default()
        };

        let name = assign_device_name(&store, &parts).await.unwrap();
        assert_eq!(name, "notenantgroup-nosite-notenant-patch-panel-01");
    }

    #[test]
    fn test_naming_convention_from_str() {
        assert_eq!(
            "domain".parse::<NamingConvention>().unwrap(),
            NamingConvention::Domain
        );
        assert_eq!(
            "gateway".parse::<NamingConvention>().unwrap(),
            NamingConvention::Gateway
        );
        assert!("fancy".parse::<NamingConvention>().is_err());
    }
}
