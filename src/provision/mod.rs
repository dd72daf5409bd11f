//! The provisioning pipeline: allocate a VID, derive name + VNI, create the
//! VLAN, optionally get-or-create/reassign the prefix, and terminate the
//! VLAN into its overlay domain.
//!
//! The pipeline is linear with early exits and deliberately
//! non-transactional: the VLAN write is the first write, and a later
//! failure leaves earlier writes committed. Callers surface the report so
//! partial runs can be cleaned up by hand.

use anyhow::{anyhow, Result};

use crate::alloc::{self, VidRequest};
use crate::db::{NotFoundError, Store};
use crate::models::*;
use crate::naming::{self, NamingConvention};
use crate::vni;

/// Execute one provisioning run against the store.
///
/// Business-rule failures (pool exhausted, manual VID taken) come back as
/// `alloc::AllocError` inside the error chain, before any write. Store
/// errors abort the run at the failing step.
pub async fn run(
    store: &Store,
    convention: NamingConvention,
    req: &ProvisionRequest,
) -> Result<ProvisionReport> {
    let group = store
        .get_vlan_group(req.group_id)
        .await?
        .ok_or_else(|| NotFoundError::new("VLAN group", &req.group_id.to_string()))?;
    let l2vpn = store
        .get_l2vpn(req.l2vpn_id)
        .await?
        .ok_or_else(|| NotFoundError::new("L2VPN", &req.l2vpn_id.to_string()))?;

    // Tenancy is inherited from the overlay domain
    let tenant = match l2vpn.tenant_id {
        Some(tenant_id) => Some(
            store
                .get_tenant(tenant_id)
                .await?
                .ok_or_else(|| NotFoundError::new("Tenant", &tenant_id.to_string()))?,
        ),
        None => None,
    };
    let role = match req.role_id {
        Some(role_id) => Some(
            store
                .get_vlan_role(role_id)
                .await?
                .ok_or_else(|| NotFoundError::new("VLAN role", &role_id.to_string()))?,
        ),
        None => None,
    };

    let vid_request = match (req.mode, req.manual_vid) {
        (AllocationMode::Auto, _) => VidRequest::Auto,
        (AllocationMode::Manual, Some(vid)) => VidRequest::Manual(vid),
        (AllocationMode::Manual, None) => {
            return Err(anyhow!("manual allocation mode requires manual_vid"));
        }
    };

    // Snapshot used VIDs immediately before deciding; the unique
    // (group_id, vid) index catches a racing run at the insert below.
    let used = store.list_used_vids(group.id).await?;
    let vid = alloc::allocate(&group.vid_ranges, &used, vid_request).map_err(anyhow::Error::new)?;

    let vlan_name = naming::vlan_name(
        convention,
        &group.slug,
        tenant.as_ref().map(|t| t.slug.as_str()),
        &l2vpn.slug,
        vid,
    );
    let vni = vni::encode(l2vpn.identifier, vid)?;

    let mut log = Vec::new();
    let description = req.description.clone().unwrap_or_default();

    let vlan = store
        .create_vlan(&NewVlan {
            name: vlan_name.clone(),
            vid,
            group_id: group.id,
            tenant_id: tenant.as_ref().map(|t| t.id),
            role_id: role.as_ref().map(|r| r.id),
            description: description.clone(),
            vni,
        })
        .await?;
    tracing::info!(vlan = %vlan.name, vid, vni, "created VLAN");
    log.push(format!("Created VLAN {} (vid {}, VNI {})", vlan.name, vid, vni));

    let mut prefix_cidr = None;
    let mut prefix_created = None;
    if let Some(cidr) = req.prefix.as_deref() {
        match store.find_prefix_by_cidr(cidr).await? {
            Some(existing) => {
                // Get-or-create with reassignment: an existing prefix is
                // repointed at the new VLAN, and the report says so.
                tracing::warn!(
                    prefix = %existing.prefix,
                    old_vlan = ?existing.vlan_id,
                    new_vlan = vlan.id,
                    "reassigning existing prefix to newly provisioned VLAN"
                );
                let updated = store
                    .reassign_prefix(existing.id, vlan.id, tenant.as_ref().map(|t| t.id))
                    .await?;
                log.push(match existing.vlan_id {
                    Some(old) => format!(
                        "Reassigned existing prefix {} from VLAN {} to VLAN {}",
                        updated.prefix, old, vlan.id
                    ),
                    None => format!(
                        "Assigned existing prefix {} to VLAN {}",
                        updated.prefix, vlan.id
                    ),
                });
                prefix_cidr = Some(updated.prefix);
                prefix_created = Some(false);
            }
            None => {
                let created = store
                    .create_prefix(&NewPrefix {
                        cidr: cidr.to_string(),
                        vlan_id: Some(vlan.id),
                        tenant_id: tenant.as_ref().map(|t| t.id),
                        role_id: role.as_ref().map(|r| r.id),
                        status: ipam_status::ACTIVE.to_string(),
                        description: description.clone(),
                    })
                    .await?;
                tracing::info!(prefix = %created.prefix, vlan = vlan.id, "created prefix");
                log.push(format!("Created prefix {}", created.prefix));
                prefix_cidr = Some(created.prefix);
                prefix_created = Some(true);
            }
        }
    }

    let termination = store.create_termination(l2vpn.id, vlan.id).await?;
    tracing::info!(l2vpn = %l2vpn.name, vlan = %vlan.name, "created L2VPN termination");
    log.push(format!(
        "Terminated VLAN {} into L2VPN {} (termination {})",
        vlan.name, l2vpn.name, termination.id
    ));

    Ok(ProvisionReport {
        vlan_id: vlan.id,
        vlan_name: vlan.name,
        vid,
        vni,
        group: group.name,
        l2vpn: l2vpn.name,
        tenant: tenant.map(|t| t.name),
        role: role.map(|r| r.name),
        description,
        prefix: prefix_cidr,
        prefix_created,
        log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::AllocError;

    async fn test_store() -> Store {
        // Single connection so the in-memory database is shared
        Store::with_pool_size(":memory:", 1)
            .await
            .expect("in-memory store")
    }

    async fn seed_group(store: &Store, name: &str, ranges: &[(u16, u16)]) -> VlanGroup {
        store
            .create_vlan_group(&CreateVlanGroupRequest {
                name: name.to_string(),
                slug: None,
                vid_ranges: ranges.iter().map(|&(s, e)| VidRange::new(s, e)).collect(),
                description: None,
            })
            .await
            .expect("vlan group")
    }

    async fn seed_l2vpn(
        store: &Store,
        name: &str,
        identifier: i64,
        tenant_id: Option<i64>,
    ) -> L2vpn {
        store
            .create_l2vpn(&CreateL2vpnRequest {
                name: name.to_string(),
                slug: None,
                identifier,
                tenant_id,
                description: None,
            })
            .await
            .expect("l2vpn")
    }

    fn request(group: &VlanGroup, l2vpn: &L2vpn) -> ProvisionRequest {
        ProvisionRequest {
            group_id: group.id,
            l2vpn_id: l2vpn.id,
            description: Some("test vxlan".to_string()),
            mode: AllocationMode::Auto,
            manual_vid: None,
            prefix: None,
            role_id: None,
        }
    }

    #[tokio::test]
    async fn auto_mode_provisions_first_free_vid() {
        let store = test_store().await;
        let group = seed_group(&store, "Core Fabric", &[(10, 12)]).await;
        let l2vpn = seed_l2vpn(&store, "GW East", 77, None).await;

        let report = run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .expect("provision");

        assert_eq!(report.vid, 10);
        assert_eq!(report.vni, 770010);
        assert_eq!(report.vlan_name, "V_CORE-FABRIC_NOTENANT_0010");
        assert_eq!(report.prefix, None);
        assert_eq!(report.prefix_created, None);

        let terminations = store.list_terminations().await.unwrap();
        assert_eq!(terminations.len(), 1);
        assert_eq!(terminations[0].vlan_id, report.vlan_id);
        assert!(store.list_prefixes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sequential_runs_advance_through_the_pool() {
        let store = test_store().await;
        let group = seed_group(&store, "fab", &[(10, 12)]).await;
        let l2vpn = seed_l2vpn(&store, "gw", 500, None).await;

        let first = run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .unwrap();
        let second = run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .unwrap();

        assert_eq!(first.vid, 10);
        assert_eq!(second.vid, 11);
        assert_eq!(second.vni, 5000011);
    }

    #[tokio::test]
    async fn tenant_is_inherited_from_the_l2vpn() {
        let store = test_store().await;
        let tenant = store
            .create_tenant(&CreateTenantRequest {
                name: "Acme".to_string(),
                slug: None,
                group_id: None,
                description: None,
            })
            .await
            .unwrap();
        let group = seed_group(&store, "fab", &[(100, 199)]).await;
        let l2vpn = seed_l2vpn(&store, "gw", 9, Some(tenant.id)).await;

        let report = run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .unwrap();

        assert_eq!(report.vlan_name, "V_FAB_ACME_0100");
        assert_eq!(report.tenant.as_deref(), Some("Acme"));
        let vlan = store.get_vlan(report.vlan_id).await.unwrap().unwrap();
        assert_eq!(vlan.tenant_id, Some(tenant.id));
    }

    #[tokio::test]
    async fn gateway_convention_names_after_the_overlay_domain() {
        let store = test_store().await;
        let group = seed_group(&store, "fab", &[(10, 12)]).await;
        let l2vpn = seed_l2vpn(&store, "GW East", 77, None).await;

        let report = run(&store, NamingConvention::Gateway, &request(&group, &l2vpn))
            .await
            .unwrap();

        assert_eq!(report.vlan_name, "V_GW-EAST_0010");
    }

    #[tokio::test]
    async fn exhausted_pool_fails_before_any_write() {
        let store = test_store().await;
        let group = seed_group(&store, "fab", &[(10, 11)]).await;
        let l2vpn = seed_l2vpn(&store, "gw", 500, None).await;

        run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .unwrap();
        run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .unwrap();

        let vlans_before = store.list_vlans().await.unwrap().len();
        let terminations_before = store.list_terminations().await.unwrap().len();

        let err = run(&store, NamingConvention::Domain, &request(&group, &l2vpn))
            .await
            .expect_err("pool is exhausted");
        assert_eq!(
            err.downcast_ref::<AllocError>(),
            Some(&AllocError::Exhausted)
        );

        assert_eq!(store.list_vlans().await.unwrap().len(), vlans_before);
        assert_eq!(
            store.list_terminations().await.unwrap().len(),
            terminations_before
        );
    }

    #[tokio::test]
    async fn manual_mode_honors_and_conflicts_on_requested_vid() {
        let store = test_store().await;
        let group = seed_group(&store, "fab", &[(10, 12)]).await;
        let l2vpn = seed_l2vpn(&store, "gw", 500, None).await;

        let mut req = request(&group, &l2vpn);
        req.mode = AllocationMode::Manual;
        req.manual_vid = Some(11);
        let report = run(&store, NamingConvention::Domain, &req).await.unwrap();
        assert_eq!(report.vid, 11);

        let err = run(&store, NamingConvention::Domain, &req)
            .await
            .expect_err("vid already taken");
        assert_eq!(
            err.downcast_ref::<AllocError>(),
            Some(&AllocError::Conflict(11))
        );
    }

    #[tokio::test]
    async fn manual_mode_accepts_a_vid_outside_the_ranges() {
        let store = test_store().await;
        let group = seed_group(&store, "fab", &[(10, 12)]).await;
        let l2vpn = seed_l2vpn(&store, "gw", 500, None).await;

        let mut req = request(&group, &l2vpn);
        req.mode = AllocationMode::Manual;
        req.manual_vid = Some(4000);
        let report = run(&store, NamingConvention::Domain, &req).await.unwrap();
        assert_eq!(report.vid, 4000);
        assert_eq!(report.vni, 5004000);
    }

    #[tokio::test]
    async fn prefix_is_created_once_then_reassigned() {
        let store = test_store().await;
        let group = seed_group(&store, "fab", &[(10, 12)]).await;
        let l2vpn = seed_l2vpn(&store, "gw", 500, None).await;

        let mut req = request(&group, &l2vpn);
        req.prefix = Some("10.20.0.0/24".to_string());

        let first = run(&store, NamingConvention::Domain, &req).await.unwrap();
        assert_eq!(first.prefix.as_deref(), Some("10.20.0.0/24"));
        assert_eq!(first.prefix_created, Some(true));

        let second = run(&store, NamingConvention::Domain, &req).await.unwrap();
        assert_eq!(second.prefix_created, Some(false));

        let prefixes = store.list_prefixes().await.unwrap();
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0].vlan_id, Some(second.vlan_id));
    }

    #[tokio::test]
    async fn unknown_group_is_a_not_found_error() {
        let store = test_store().await;
        let l2vpn = seed_l2vpn(&store, "gw", 500, None).await;

        let req = ProvisionRequest {
            group_id: 999,
            l2vpn_id: l2vpn.id,
            description: None,
            mode: AllocationMode::Auto,
            manual_vid: None,
            prefix: None,
            role_id: None,
        };
        let err = run(&store, NamingConvention::Domain, &req)
            .await
            .expect_err("group does not exist");
        assert!(err.downcast_ref::<NotFoundError>().is_some());
    }
}
