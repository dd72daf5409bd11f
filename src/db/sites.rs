use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::{none_if_empty, slug_or_derive};
use crate::models::*;

fn map_site_row(row: &SqliteRow) -> Site {
    Site {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        status: row.get("status"),
        description: none_if_empty(row.get("description")),
        rack_count: row.try_get("rack_count").ok(),
        device_count: row.try_get("device_count").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_rack_row(row: &SqliteRow) -> Rack {
    Rack {
        id: row.get("id"),
        name: row.get("name"),
        site_id: row.get("site_id"),
        site_name: row.try_get("site_name").ok(),
        u_height: row.get("u_height"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct SiteRepo;

impl SiteRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Site>> {
        let rows = sqlx::query(
            r#"
            SELECT s.*,
                   COALESCE((SELECT COUNT(*) FROM racks r WHERE r.site_id = s.id), 0) as rack_count,
                   COALESCE((SELECT COUNT(*) FROM devices d WHERE d.site_id = s.id), 0) as device_count
            FROM sites s ORDER BY s.name
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_site_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Site>> {
        let row = sqlx::query("SELECT * FROM sites WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_site_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateSiteRequest) -> Result<Site> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            r#"
            INSERT INTO sites (name, slug, status, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.status.as_deref().unwrap_or(site_status::ACTIVE))
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("Site not found after creation")
    }

    pub async fn update(pool: &Pool<Sqlite>, id: i64, req: &CreateSiteRequest) -> Result<Site> {
        let now = Utc::now();
        let slug = slug_or_derive(&req.slug, &req.name);
        let result = sqlx::query(
            "UPDATE sites SET name = ?, slug = ?, status = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&slug)
        .bind(req.status.as_deref().unwrap_or(site_status::ACTIVE))
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Site", &id.to_string()).into());
        }

        Self::get(pool, id)
            .await?
            .context("Site not found after update")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM sites WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Site", &id.to_string()).into());
        }
        Ok(())
    }
}

pub struct RackRepo;

impl RackRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Rack>> {
        let rows = sqlx::query(
            r#"
            SELECT r.*, s.name as site_name
            FROM racks r
            LEFT JOIN sites s ON r.site_id = s.id
            ORDER BY s.name, r.name
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_rack_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Rack>> {
        let row = sqlx::query(
            "SELECT r.*, s.name as site_name FROM racks r LEFT JOIN sites s ON r.site_id = s.id WHERE r.id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.as_ref().map(map_rack_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, req: &CreateRackRequest) -> Result<Rack> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO racks (name, site_id, u_height, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(req.site_id)
        .bind(req.u_height.unwrap_or(42))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("Rack not found after creation")
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM racks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Rack", &id.to_string()).into());
        }
        Ok(())
    }
}
