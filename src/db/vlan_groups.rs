use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::{none_if_empty, slug_or_derive};
use crate::alloc;
use crate::models::*;

fn map_vlan_group_row(row: &SqliteRow) -> VlanGroup {
    let ranges_json: String = row.get("vid_ranges");
    let vid_ranges: Vec<VidRange> = serde_json::from_str(&ranges_json).unwrap_or_default();
    VlanGroup {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        vid_ranges,
        description: none_if_empty(row.get("description")),
        vlan_count: row.try_get("vlan_count").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct VlanGroupRepo;

impl VlanGroupRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<VlanGroup>> {
        let rows = sqlx::query(
            r#"
            SELECT g.*,
                   COALESCE((SELECT COUNT(*) FROM vlans v WHERE v.group_id = g.id), 0) as vlan_count
            FROM vlan_groups g ORDER BY g.name
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_vlan_group_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<VlanGroup>> {
        let row = sqlx::query("SELECT * FROM vlan_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_vlan_group_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateVlanGroupRequest) -> Result<VlanGroup> {
        alloc::validate_ranges(&req.vid_ranges).map_err(|e| anyhow!(e))?;

        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let ranges_json = serde_json::to_string(&req.vid_ranges)?;
        let result = sqlx::query(
            r#"
            INSERT INTO vlan_groups (name, slug, vid_ranges, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(&ranges_json)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("VLAN group not found after creation")
    }

    pub async fn update(
        pool: &Pool<Sqlite>,
        id: i64,
        req: &CreateVlanGroupRequest,
    ) -> Result<VlanGroup> {
        alloc::validate_ranges(&req.vid_ranges).map_err(|e| anyhow!(e))?;

        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let ranges_json = serde_json::to_string(&req.vid_ranges)?;
        let result = sqlx::query(
            "UPDATE vlan_groups SET name = ?, slug = ?, vid_ranges = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(&ranges_json)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("VLAN group", &id.to_string()).into());
        }

        Self::get(pool, id)
            .await?
            .context("VLAN group not found after update")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM vlan_groups WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("VLAN group", &id.to_string()).into());
        }
        Ok(())
    }
}
