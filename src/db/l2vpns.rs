use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::{none_if_empty, slug_or_derive};
use crate::models::*;

const SELECT_L2VPN: &str = r#"
    SELECT l.*,
           t.name as tenant_name,
           COALESCE((SELECT COUNT(*) FROM l2vpn_terminations lt WHERE lt.l2vpn_id = l.id), 0) as termination_count
    FROM l2vpns l
    LEFT JOIN tenants t ON l.tenant_id = t.id
"#;

fn map_l2vpn_row(row: &SqliteRow) -> L2vpn {
    L2vpn {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        identifier: row.get("identifier"),
        tenant_id: row.try_get::<Option<i64>, _>("tenant_id").ok().flatten(),
        tenant_name: row.try_get("tenant_name").ok(),
        description: none_if_empty(row.get("description")),
        termination_count: row.try_get("termination_count").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_termination_row(row: &SqliteRow) -> L2vpnTermination {
    L2vpnTermination {
        id: row.get("id"),
        l2vpn_id: row.get("l2vpn_id"),
        l2vpn_name: row.try_get("l2vpn_name").ok(),
        vlan_id: row.get("vlan_id"),
        vlan_name: row.try_get("vlan_name").ok(),
        created_at: row.get("created_at"),
    }
}

pub struct L2vpnRepo;

impl L2vpnRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<L2vpn>> {
        let rows = sqlx::query(&format!("{} ORDER BY l.name", SELECT_L2VPN))
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_l2vpn_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<L2vpn>> {
        let row = sqlx::query(&format!("{} WHERE l.id = ?", SELECT_L2VPN))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_l2vpn_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateL2vpnRequest) -> Result<L2vpn> {
        if req.identifier < 0 {
            return Err(anyhow!("L2VPN identifier must be a non-negative integer"));
        }

        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            r#"
            INSERT INTO l2vpns (name, slug, identifier, tenant_id, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.identifier)
        .bind(req.tenant_id)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("L2VPN not found after creation")
    }

    pub async fn update(pool: &Pool<Sqlite>, id: i64, req: &CreateL2vpnRequest) -> Result<L2vpn> {
        if req.identifier < 0 {
            return Err(anyhow!("L2VPN identifier must be a non-negative integer"));
        }

        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            "UPDATE l2vpns SET name = ?, slug = ?, identifier = ?, tenant_id = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.identifier)
        .bind(req.tenant_id)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("L2VPN", &id.to_string()).into());
        }

        Self::get(pool, id)
            .await?
            .context("L2VPN not found after update")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM l2vpns WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("L2VPN", &id.to_string()).into());
        }
        Ok(())
    }
}

const SELECT_TERMINATION: &str = r#"
    SELECT lt.*, l.name as l2vpn_name, v.name as vlan_name
    FROM l2vpn_terminations lt
    LEFT JOIN l2vpns l ON lt.l2vpn_id = l.id
    LEFT JOIN vlans v ON lt.vlan_id = v.id
"#;

pub struct TerminationRepo;

impl TerminationRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<L2vpnTermination>> {
        let rows = sqlx::query(&format!("{} ORDER BY lt.id", SELECT_TERMINATION))
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_termination_row).collect())
    }

    pub async fn list_by_l2vpn(pool: &Pool<Sqlite>, l2vpn_id: i64) -> Result<Vec<L2vpnTermination>> {
        let rows = sqlx::query(&format!(
            "{} WHERE lt.l2vpn_id = ? ORDER BY lt.id",
            SELECT_TERMINATION
        ))
        .bind(l2vpn_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_termination_row).collect())
    }

    pub async fn create(
        pool: &Pool<Sqlite>,
        l2vpn_id: i64,
        vlan_id: i64,
    ) -> Result<L2vpnTermination> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO l2vpn_terminations (l2vpn_id, vlan_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(l2vpn_id)
        .bind(vlan_id)
        .bind(now)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to terminate VLAN {} into L2VPN {}", vlan_id, l2vpn_id))?;

        let row = sqlx::query(&format!("{} WHERE lt.id = ?", SELECT_TERMINATION))
            .bind(result.last_insert_rowid())
            .fetch_optional(pool)
            .await?;
        row.as_ref()
            .map(map_termination_row)
            .context("L2VPN termination not found after creation")
    }
}
