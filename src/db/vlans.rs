use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::none_if_empty;
use crate::models::*;

const SELECT_VLAN: &str = r#"
    SELECT v.*,
           g.name as group_name,
           t.name as tenant_name,
           r.name as role_name
    FROM vlans v
    LEFT JOIN vlan_groups g ON v.group_id = g.id
    LEFT JOIN tenants t ON v.tenant_id = t.id
    LEFT JOIN vlan_roles r ON v.role_id = r.id
"#;

fn map_vlan_row(row: &SqliteRow) -> Vlan {
    Vlan {
        id: row.get("id"),
        name: row.get("name"),
        vid: row.get::<i64, _>("vid") as u16,
        group_id: row.get("group_id"),
        group_name: row.try_get("group_name").ok(),
        tenant_id: row.try_get::<Option<i64>, _>("tenant_id").ok().flatten(),
        tenant_name: row.try_get("tenant_name").ok(),
        role_id: row.try_get::<Option<i64>, _>("role_id").ok().flatten(),
        role_name: row.try_get("role_name").ok(),
        description: none_if_empty(row.get("description")),
        vni: row.try_get::<Option<i64>, _>("vni").ok().flatten(),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct VlanRepo;

impl VlanRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Vlan>> {
        let rows = sqlx::query(&format!("{} ORDER BY v.group_id, v.vid", SELECT_VLAN))
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_vlan_row).collect())
    }

    pub async fn list_by_group(pool: &Pool<Sqlite>, group_id: i64) -> Result<Vec<Vlan>> {
        let rows = sqlx::query(&format!(
            "{} WHERE v.group_id = ? ORDER BY v.vid",
            SELECT_VLAN
        ))
        .bind(group_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_vlan_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Vlan>> {
        let row = sqlx::query(&format!("{} WHERE v.id = ?", SELECT_VLAN))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_vlan_row))
    }

    pub async fn list_used_vids(pool: &Pool<Sqlite>, group_id: i64) -> Result<HashSet<u16>> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT vid FROM vlans WHERE group_id = ?")
            .bind(group_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(vid,)| vid as u16).collect())
    }

    pub async fn vid_exists(pool: &Pool<Sqlite>, group_id: i64, vid: u16) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM vlans WHERE group_id = ? AND vid = ?")
                .bind(group_id)
                .bind(vid as i64)
                .fetch_optional(pool)
                .await?;
        Ok(row.is_some())
    }

    pub async fn create(pool: &Pool<Sqlite>, new: &NewVlan) -> Result<Vlan> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO vlans (name, vid, group_id, tenant_id, role_id, description, vni, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(new.vid as i64)
        .bind(new.group_id)
        .bind(new.tenant_id)
        .bind(new.role_id)
        .bind(&new.description)
        .bind(new.vni)
        .bind(ipam_status::ACTIVE)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create VLAN {} (vid {})", new.name, new.vid))?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("VLAN not found after creation")
    }
}
