use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::{none_if_empty, slug_or_derive};
use crate::models::*;

fn map_vlan_role_row(row: &SqliteRow) -> VlanRole {
    VlanRole {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: none_if_empty(row.get("description")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct VlanRoleRepo;

impl VlanRoleRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<VlanRole>> {
        let rows = sqlx::query("SELECT * FROM vlan_roles ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_vlan_role_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<VlanRole>> {
        let row = sqlx::query("SELECT * FROM vlan_roles WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_vlan_role_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateVlanRoleRequest) -> Result<VlanRole> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            r#"
            INSERT INTO vlan_roles (name, slug, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("VLAN role not found after creation")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM vlan_roles WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("VLAN role", &id.to_string()).into());
        }
        Ok(())
    }
}
