use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::row_helpers::none_if_empty;
use crate::models::*;
use crate::utils;

const SELECT_PREFIX: &str = r#"
    SELECT p.*, v.name as vlan_name
    FROM prefixes p
    LEFT JOIN vlans v ON p.vlan_id = v.id
"#;

fn map_prefix_row(row: &SqliteRow) -> Prefix {
    Prefix {
        id: row.get("id"),
        prefix: row.get("prefix"),
        network_int: row.get("network_int"),
        broadcast_int: row.get("broadcast_int"),
        prefix_length: row.get("prefix_length"),
        vlan_id: row.try_get::<Option<i64>, _>("vlan_id").ok().flatten(),
        vlan_name: row.try_get("vlan_name").ok(),
        tenant_id: row.try_get::<Option<i64>, _>("tenant_id").ok().flatten(),
        role_id: row.try_get::<Option<i64>, _>("role_id").ok().flatten(),
        status: row.get("status"),
        description: none_if_empty(row.get("description")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct PrefixRepo;

impl PrefixRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Prefix>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY p.network_int, p.prefix_length",
            SELECT_PREFIX
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_prefix_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Prefix>> {
        let row = sqlx::query(&format!("{} WHERE p.id = ?", SELECT_PREFIX))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_prefix_row))
    }

    /// Look a prefix up by CIDR, matching on the canonical network and
    /// broadcast so "10.0.0.5/24" and "10.0.0.0/24" find the same row.
    pub async fn find_by_cidr(pool: &Pool<Sqlite>, cidr: &str) -> Result<Option<Prefix>> {
        let (network, broadcast, _) = utils::parse_cidr(cidr).map_err(|e| anyhow!("{}", e))?;
        let row = sqlx::query(&format!(
            "{} WHERE p.network_int = ? AND p.broadcast_int = ?",
            SELECT_PREFIX
        ))
        .bind(network as i64)
        .bind(broadcast as i64)
        .fetch_optional(pool)
        .await?;
        Ok(row.as_ref().map(map_prefix_row))
    }

    pub async fn create(pool: &Pool<Sqlite>, new: &NewPrefix) -> Result<Prefix> {
        let (network, broadcast, prefix_len) =
            utils::parse_cidr(&new.cidr).map_err(|e| anyhow!("{}", e))?;

        let existing: Option<(i64, String)> =
            sqlx::query_as("SELECT id, prefix FROM prefixes WHERE network_int = ? AND broadcast_int = ?")
                .bind(network as i64)
                .bind(broadcast as i64)
                .fetch_optional(pool)
                .await?;
        if let Some((existing_id, existing_prefix)) = existing {
            return Err(anyhow!(
                "Duplicate prefix: {} already exists (id={})",
                existing_prefix,
                existing_id
            ));
        }

        let now = Utc::now();
        let canonical = utils::format_cidr(network, prefix_len);
        let result = sqlx::query(
            r#"
            INSERT INTO prefixes (prefix, network_int, broadcast_int, prefix_length,
                vlan_id, tenant_id, role_id, status, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&canonical)
        .bind(network as i64)
        .bind(broadcast as i64)
        .bind(prefix_len as i32)
        .bind(new.vlan_id)
        .bind(new.tenant_id)
        .bind(new.role_id)
        .bind(&new.status)
        .bind(&new.description)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("Prefix not found after creation")
    }

    pub async fn reassign(
        pool: &Pool<Sqlite>,
        id: i64,
        vlan_id: i64,
        tenant_id: Option<i64>,
    ) -> Result<Prefix> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE prefixes SET vlan_id = ?, tenant_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(vlan_id)
        .bind(tenant_id)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Prefix", &id.to_string()).into());
        }

        Self::get(pool, id)
            .await?
            .context("Prefix not found after reassignment")
    }
}
