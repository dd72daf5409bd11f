use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::none_if_empty;
use crate::models::*;

const SELECT_DEVICE: &str = r#"
    SELECT d.*,
           t.name as tenant_name,
           s.name as site_name,
           dr.name as role_name,
           rk.name as rack_name
    FROM devices d
    LEFT JOIN tenants t ON d.tenant_id = t.id
    LEFT JOIN sites s ON d.site_id = s.id
    LEFT JOIN device_roles dr ON d.role_id = dr.id
    LEFT JOIN racks rk ON d.rack_id = rk.id
"#;

fn map_device_row(row: &SqliteRow) -> Device {
    Device {
        id: row.get("id"),
        name: row.get("name"),
        tenant_id: row.try_get::<Option<i64>, _>("tenant_id").ok().flatten(),
        tenant_name: row.try_get("tenant_name").ok(),
        site_id: row.try_get::<Option<i64>, _>("site_id").ok().flatten(),
        site_name: row.try_get("site_name").ok(),
        role_id: row.try_get::<Option<i64>, _>("role_id").ok().flatten(),
        role_name: row.try_get("role_name").ok(),
        rack_id: row.try_get::<Option<i64>, _>("rack_id").ok().flatten(),
        rack_name: row.try_get("rack_name").ok(),
        position: row.try_get::<Option<i64>, _>("position").ok().flatten(),
        status: row.get("status"),
        description: none_if_empty(row.get("description")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct DeviceRepo;

impl DeviceRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Device>> {
        let rows = sqlx::query(&format!("{} ORDER BY d.name", SELECT_DEVICE))
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_device_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Device>> {
        let row = sqlx::query(&format!("{} WHERE d.id = ?", SELECT_DEVICE))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_device_row))
    }

    /// Uniqueness probe for the auto-naming counter loop. Always hits the
    /// live table, never a cached snapshot.
    pub async fn name_exists(pool: &Pool<Sqlite>, name: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM devices WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn create(
        pool: &Pool<Sqlite>,
        name: &str,
        req: &CreateDeviceRequest,
    ) -> Result<Device> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO devices (name, tenant_id, site_id, role_id, rack_id, position, status, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(req.tenant_id)
        .bind(req.site_id)
        .bind(req.role_id)
        .bind(req.rack_id)
        .bind(req.position)
        .bind(req.status.as_deref().unwrap_or(device_status::ACTIVE))
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create device {}", name))?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("Device not found after creation")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM devices WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Device", &id.to_string()).into());
        }
        Ok(())
    }
}
