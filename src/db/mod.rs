mod device_roles;
mod devices;
mod l2vpns;
mod prefixes;
pub(crate) mod row_helpers;
mod sites;
mod tenants;
mod vlan_groups;
mod vlan_roles;
mod vlans;

use std::collections::HashSet;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::*;

/// Typed error for "resource not found" — enables reliable downcast
/// in the API error handler instead of fragile string matching.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Store handles all database operations, delegating to per-entity repo modules.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new database store with a specific pool size.
    /// `:memory:` opens an in-memory database; callers should pair it with
    /// a single-connection pool so every query sees the same database.
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        let db_url = if db_path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", db_path)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations and seed defaults
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        self.seed_default_device_roles().await?;
        self.seed_default_vlan_roles().await?;

        Ok(())
    }

    async fn seed_default_device_roles(&self) -> Result<()> {
        let defaults = [
            ("Switch", "switch", "Access/aggregation switch"),
            ("Router", "router", "Layer-3 router"),
            ("Firewall", "firewall", "Security appliance"),
            ("Patch Panel", PATCH_PANEL_ROLE, "Passive patch panel"),
        ];
        for (name, slug, description) in defaults {
            sqlx::query(
                r#"
                INSERT INTO device_roles (name, slug, description, created_at, updated_at)
                SELECT ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
                WHERE NOT EXISTS (SELECT 1 FROM device_roles WHERE slug = ?)
                "#,
            )
            .bind(name)
            .bind(slug)
            .bind(description)
            .bind(slug)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn seed_default_vlan_roles(&self) -> Result<()> {
        let defaults = [
            ("Server", "server", "Server-facing VLANs"),
            ("Storage", "storage", "Storage traffic"),
            ("Management", "management", "Out-of-band management"),
        ];
        for (name, slug, description) in defaults {
            sqlx::query(
                r#"
                INSERT INTO vlan_roles (name, slug, description, created_at, updated_at)
                SELECT ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
                WHERE NOT EXISTS (SELECT 1 FROM vlan_roles WHERE slug = ?)
                "#,
            )
            .bind(name)
            .bind(slug)
            .bind(description)
            .bind(slug)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    // ========== Tenant Group Operations ==========

    pub async fn list_tenant_groups(&self) -> Result<Vec<TenantGroup>> {
        tenants::TenantGroupRepo::list(&self.pool).await
    }

    pub async fn get_tenant_group(&self, id: i64) -> Result<Option<TenantGroup>> {
        tenants::TenantGroupRepo::get(&self.pool, id).await
    }

    pub async fn create_tenant_group(&self, req: &CreateTenantGroupRequest) -> Result<TenantGroup> {
        tenants::TenantGroupRepo::create(&self.pool, req).await
    }

    pub async fn update_tenant_group(
        &self,
        id: i64,
        req: &CreateTenantGroupRequest,
    ) -> Result<TenantGroup> {
        tenants::TenantGroupRepo::update(&self.pool, id, req).await
    }

    pub async fn delete_tenant_group(&self, id: i64) -> Result<()> {
        tenants::TenantGroupRepo::delete(&self.pool, id).await
    }

    // ========== Tenant Operations ==========

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        tenants::TenantRepo::list(&self.pool).await
    }

    pub async fn get_tenant(&self, id: i64) -> Result<Option<Tenant>> {
        tenants::TenantRepo::get(&self.pool, id).await
    }

    pub async fn create_tenant(&self, req: &CreateTenantRequest) -> Result<Tenant> {
        tenants::TenantRepo::create(&self.pool, req).await
    }

    pub async fn update_tenant(&self, id: i64, req: &CreateTenantRequest) -> Result<Tenant> {
        tenants::TenantRepo::update(&self.pool, id, req).await
    }

    pub async fn delete_tenant(&self, id: i64) -> Result<()> {
        tenants::TenantRepo::delete(&self.pool, id).await
    }

    // ========== Site Operations ==========

    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        sites::SiteRepo::list(&self.pool).await
    }

    pub async fn get_site(&self, id: i64) -> Result<Option<Site>> {
        sites::SiteRepo::get(&self.pool, id).await
    }

    pub async fn create_site(&self, req: &CreateSiteRequest) -> Result<Site> {
        sites::SiteRepo::create(&self.pool, req).await
    }

    pub async fn update_site(&self, id: i64, req: &CreateSiteRequest) -> Result<Site> {
        sites::SiteRepo::update(&self.pool, id, req).await
    }

    pub async fn delete_site(&self, id: i64) -> Result<()> {
        sites::SiteRepo::delete(&self.pool, id).await
    }

    // ========== Rack Operations ==========

    pub async fn list_racks(&self) -> Result<Vec<Rack>> {
        sites::RackRepo::list(&self.pool).await
    }

    pub async fn get_rack(&self, id: i64) -> Result<Option<Rack>> {
        sites::RackRepo::get(&self.pool, id).await
    }

    pub async fn create_rack(&self, req: &CreateRackRequest) -> Result<Rack> {
        sites::RackRepo::create(&self.pool, req).await
    }

    pub async fn delete_rack(&self, id: i64) -> Result<()> {
        sites::RackRepo::delete(&self.pool, id).await
    }

    // ========== Device Role Operations ==========

    pub async fn list_device_roles(&self) -> Result<Vec<DeviceRole>> {
        device_roles::DeviceRoleRepo::list(&self.pool).await
    }

    pub async fn get_device_role(&self, id: i64) -> Result<Option<DeviceRole>> {
        device_roles::DeviceRoleRepo::get(&self.pool, id).await
    }

    pub async fn create_device_role(&self, req: &CreateDeviceRoleRequest) -> Result<DeviceRole> {
        device_roles::DeviceRoleRepo::create(&self.pool, req).await
    }

    pub async fn delete_device_role(&self, id: i64) -> Result<()> {
        device_roles::DeviceRoleRepo::delete(&self.pool, id).await
    }

    // ========== VLAN Role Operations ==========

    pub async fn list_vlan_roles(&self) -> Result<Vec<VlanRole>> {
        vlan_roles::VlanRoleRepo::list(&self.pool).await
    }

    pub async fn get_vlan_role(&self, id: i64) -> Result<Option<VlanRole>> {
        vlan_roles::VlanRoleRepo::get(&self.pool, id).await
    }

    pub async fn create_vlan_role(&self, req: &CreateVlanRoleRequest) -> Result<VlanRole> {
        vlan_roles::VlanRoleRepo::create(&self.pool, req).await
    }

    pub async fn delete_vlan_role(&self, id: i64) -> Result<()> {
        vlan_roles::VlanRoleRepo::delete(&self.pool, id).await
    }

    // ========== VLAN Group Operations ==========

    pub async fn list_vlan_groups(&self) -> Result<Vec<VlanGroup>> {
        vlan_groups::VlanGroupRepo::list(&self.pool).await
    }

    pub async fn get_vlan_group(&self, id: i64) -> Result<Option<VlanGroup>> {
        vlan_groups::VlanGroupRepo::get(&self.pool, id).await
    }

    pub async fn create_vlan_group(&self, req: &CreateVlanGroupRequest) -> Result<VlanGroup> {
        vlan_groups::VlanGroupRepo::create(&self.pool, req).await
    }

    pub async fn update_vlan_group(
        &self,
        id: i64,
        req: &CreateVlanGroupRequest,
    ) -> Result<VlanGroup> {
        vlan_groups::VlanGroupRepo::update(&self.pool, id, req).await
    }

    pub async fn delete_vlan_group(&self, id: i64) -> Result<()> {
        vlan_groups::VlanGroupRepo::delete(&self.pool, id).await
    }

    // ========== VLAN Operations ==========

    pub async fn list_vlans(&self) -> Result<Vec<Vlan>> {
        vlans::VlanRepo::list(&self.pool).await
    }

    pub async fn list_vlans_by_group(&self, group_id: i64) -> Result<Vec<Vlan>> {
        vlans::VlanRepo::list_by_group(&self.pool, group_id).await
    }

    pub async fn get_vlan(&self, id: i64) -> Result<Option<Vlan>> {
        vlans::VlanRepo::get(&self.pool, id).await
    }

    /// Fresh snapshot of every VID consumed within a group. Allocation
    /// correctness depends on reading this immediately before deciding.
    pub async fn list_used_vids(&self, group_id: i64) -> Result<HashSet<u16>> {
        vlans::VlanRepo::list_used_vids(&self.pool, group_id).await
    }

    pub async fn vid_exists(&self, group_id: i64, vid: u16) -> Result<bool> {
        vlans::VlanRepo::vid_exists(&self.pool, group_id, vid).await
    }

    pub async fn create_vlan(&self, new: &NewVlan) -> Result<Vlan> {
        vlans::VlanRepo::create(&self.pool, new).await
    }

    // ========== Prefix Operations ==========

    pub async fn list_prefixes(&self) -> Result<Vec<Prefix>> {
        prefixes::PrefixRepo::list(&self.pool).await
    }

    pub async fn get_prefix(&self, id: i64) -> Result<Option<Prefix>> {
        prefixes::PrefixRepo::get(&self.pool, id).await
    }

    pub async fn find_prefix_by_cidr(&self, cidr: &str) -> Result<Option<Prefix>> {
        prefixes::PrefixRepo::find_by_cidr(&self.pool, cidr).await
    }

    pub async fn create_prefix(&self, new: &NewPrefix) -> Result<Prefix> {
        prefixes::PrefixRepo::create(&self.pool, new).await
    }

    /// Repoint an existing prefix at a different VLAN (and tenant).
    pub async fn reassign_prefix(
        &self,
        id: i64,
        vlan_id: i64,
        tenant_id: Option<i64>,
    ) -> Result<Prefix> {
        prefixes::PrefixRepo::reassign(&self.pool, id, vlan_id, tenant_id).await
    }

    // ========== L2VPN Operations ==========

    pub async fn list_l2vpns(&self) -> Result<Vec<L2vpn>> {
        l2vpns::L2vpnRepo::list(&self.pool).await
    }

    pub async fn get_l2vpn(&self, id: i64) -> Result<Option<L2vpn>> {
        l2vpns::L2vpnRepo::get(&self.pool, id).await
    }

    pub async fn create_l2vpn(&self, req: &CreateL2vpnRequest) -> Result<L2vpn> {
        l2vpns::L2vpnRepo::create(&self.pool, req).await
    }

    pub async fn update_l2vpn(&self, id: i64, req: &CreateL2vpnRequest) -> Result<L2vpn> {
        l2vpns::L2vpnRepo::update(&self.pool, id, req).await
    }

    pub async fn delete_l2vpn(&self, id: i64) -> Result<()> {
        l2vpns::L2vpnRepo::delete(&self.pool, id).await
    }

    // ========== L2VPN Termination Operations ==========

    pub async fn list_terminations(&self) -> Result<Vec<L2vpnTermination>> {
        l2vpns::TerminationRepo::list(&self.pool).await
    }

    pub async fn list_terminations_by_l2vpn(&self, l2vpn_id: i64) -> Result<Vec<L2vpnTermination>> {
        l2vpns::TerminationRepo::list_by_l2vpn(&self.pool, l2vpn_id).await
    }

    pub async fn create_termination(&self, l2vpn_id: i64, vlan_id: i64) -> Result<L2vpnTermination> {
        l2vpns::TerminationRepo::create(&self.pool, l2vpn_id, vlan_id).await
    }

    // ========== Device Operations ==========

    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        devices::DeviceRepo::list(&self.pool).await
    }

    pub async fn get_device(&self, id: i64) -> Result<Option<Device>> {
        devices::DeviceRepo::get(&self.pool, id).await
    }

    pub async fn device_name_exists(&self, name: &str) -> Result<bool> {
        devices::DeviceRepo::name_exists(&self.pool, name).await
    }

    pub async fn create_device(&self, name: &str, req: &CreateDeviceRequest) -> Result<Device> {
        devices::DeviceRepo::create(&self.pool, name, req).await
    }

    pub async fn delete_device(&self, id: i64) -> Result<()> {
        devices::DeviceRepo::delete(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> Store {
        // Single connection so the in-memory database is shared
        Store::with_pool_size(":memory:", 1)
            .await
            .expect("in-memory store")
    }

    async fn seed_group(store: &Store) -> VlanGroup {
        store
            .create_vlan_group(&CreateVlanGroupRequest {
                name: "fab".to_string(),
                slug: None,
                vid_ranges: vec![VidRange::new(10, 20)],
                description: None,
            })
            .await
            .expect("vlan group")
    }

    fn new_vlan(group_id: i64, name: &str, vid: u16) -> NewVlan {
        NewVlan {
            name: name.to_string(),
            vid,
            group_id,
            tenant_id: None,
            role_id: None,
            description: String::new(),
            vni: 10000 + vid as i64,
        }
    }

    #[tokio::test]
    async fn default_roles_are_seeded() {
        let store = test_store().await;
        let roles = store.list_device_roles().await.unwrap();
        assert!(roles.iter().any(|r| r.slug == PATCH_PANEL_ROLE));
        let vlan_roles = store.list_vlan_roles().await.unwrap();
        assert!(vlan_roles.iter().any(|r| r.slug == "server"));
    }

    #[tokio::test]
    async fn vid_exists_reflects_created_vlans() {
        let store = test_store().await;
        let group = seed_group(&store).await;

        assert!(!store.vid_exists(group.id, 10).await.unwrap());
        store
            .create_vlan(&new_vlan(group.id, "V_FAB_NOTENANT_0010", 10))
            .await
            .unwrap();
        assert!(store.vid_exists(group.id, 10).await.unwrap());
        assert!(!store.vid_exists(group.id, 11).await.unwrap());

        let used = store.list_used_vids(group.id).await.unwrap();
        assert!(used.contains(&10));
        assert_eq!(used.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_vid_in_group_is_rejected_by_the_index() {
        let store = test_store().await;
        let group = seed_group(&store).await;

        store
            .create_vlan(&new_vlan(group.id, "V_FAB_NOTENANT_0010", 10))
            .await
            .unwrap();
        let err = store
            .create_vlan(&new_vlan(group.id, "V_FAB_NOTENANT_0010-B", 10))
            .await
            .expect_err("vid is taken in this group");
        assert!(err.to_string().contains("vid 10"));
    }

    #[tokio::test]
    async fn group_slug_is_derived_from_the_name() {
        let store = test_store().await;
        let group = store
            .create_vlan_group(&CreateVlanGroupRequest {
                name: "Core Fabric (East)".to_string(),
                slug: None,
                vid_ranges: vec![VidRange::new(100, 199)],
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(group.slug, "core-fabric-east");
        assert_eq!(group.vid_ranges, vec![VidRange::new(100, 199)]);
    }
}
