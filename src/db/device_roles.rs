use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::{none_if_empty, slug_or_derive};
use crate::models::*;

fn map_device_role_row(row: &SqliteRow) -> DeviceRole {
    DeviceRole {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: none_if_empty(row.get("description")),
        device_count: row.try_get("device_count").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct DeviceRoleRepo;

impl DeviceRoleRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<DeviceRole>> {
        let rows = sqlx::query(
            r#"
            SELECT r.*,
                   COALESCE((SELECT COUNT(*) FROM devices d WHERE d.role_id = r.id), 0) as device_count
            FROM device_roles r ORDER BY r.name
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_device_role_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<DeviceRole>> {
        let row = sqlx::query("SELECT * FROM device_roles WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_device_role_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateDeviceRoleRequest) -> Result<DeviceRole> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            r#"
            INSERT INTO device_roles (name, slug, description, created_at, updated_at)
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
            .context("Device role not found after creation")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM device_roles WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Device role", &id.to_string()).into());
        }
        Ok(())
    }
}
