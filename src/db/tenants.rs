use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::{none_if_empty, slug_or_derive};
use crate::models::*;

fn map_tenant_group_row(row: &SqliteRow) -> TenantGroup {
    TenantGroup {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: none_if_empty(row.get("description")),
        tenant_count: row.try_get("tenant_count").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_tenant_row(row: &SqliteRow) -> Tenant {
    Tenant {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        group_id: row.try_get::<Option<i64>, _>("group_id").ok().flatten(),
        group_name: row.try_get("group_name").ok(),
        group_slug: row.try_get("group_slug").ok(),
        description: none_if_empty(row.get("description")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_TENANT: &str = r#"
    SELECT t.*, g.name as group_name, g.slug as group_slug
    FROM tenants t
    LEFT JOIN tenant_groups g ON t.group_id = g.id
"#;

pub struct TenantGroupRepo;

impl TenantGroupRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<TenantGroup>> {
        let rows = sqlx::query(
            r#"
            SELECT g.*,
                   COALESCE((SELECT COUNT(*) FROM tenants t WHERE t.group_id = g.id), 0) as tenant_count
            FROM tenant_groups g ORDER BY g.name
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_tenant_group_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<TenantGroup>> {
        let row = sqlx::query("SELECT * FROM tenant_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_tenant_group_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateTenantGroupRequest) -> Result<TenantGroup> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            r#"
            INSERT INTO tenant_groups (name, slug, description, created_at, updated_at)
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
            .context("Tenant group not found after creation")
    }

    pub async fn update(
        pool: &Pool<Sqlite>,
        id: i64,
        req: &CreateTenantGroupRequest,
    ) -> Result<TenantGroup> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            "UPDATE tenant_groups SET name = ?, slug = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Tenant group", &id.to_string()).into());
        }

        Self::get(pool, id)
            .await?
            .context("Tenant group not found after update")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tenant_groups WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Tenant group", &id.to_string()).into());
        }
        Ok(())
    }
}

pub struct TenantRepo;

impl TenantRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Tenant>> {
        let rows = sqlx::query(&format!("{} ORDER BY t.name", SELECT_TENANT))
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_tenant_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Tenant>> {
        let row = sqlx::query(&format!("{} WHERE t.id = ?", SELECT_TENANT))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_tenant_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateTenantRequest) -> Result<Tenant> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            r#"
            INSERT INTO tenants (name, slug, group_id, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.group_id)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("Tenant not found after creation")
    }

    pub async fn update(pool: &Pool<Sqlite>, id: i64, req: &CreateTenantRequest) -> Result<Tenant> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            "UPDATE tenants SET name = ?, slug = ?, group_id = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.group_id)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Tenant", &id.to_string()).into());
        }

        Self::get(pool, id)
            .await?
            .context("Tenant not found after update")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Tenant", &id.to_string()).into());
        }
        Ok(())
    }
}
