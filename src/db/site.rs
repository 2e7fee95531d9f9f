//! Site configuration repository
//!
//! A single row (id = 1) holding the blog's public identity. Reads return
//! None until the row is first written; writes upsert.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::helpers::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRecord {
    pub name: String,
    pub description: String,
    pub logo_path: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct UpsertSite {
    pub name: String,
    pub description: String,
    pub logo_path: Option<String>,
}

pub struct SiteRepository {
    pool: SqlitePool,
}

impl SiteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the site record, if configured
    pub async fn get(&self) -> Result<Option<SiteRecord>> {
        let row = sqlx::query_as::<_, (String, String, Option<String>, String)>(
            "SELECT name, description, logo_path, updated_at FROM site WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| SiteRecord {
            name: r.0,
            description: r.1,
            logo_path: r.2,
            updated_at: r.3,
        }))
    }

    /// Create or replace the site record
    pub async fn upsert(&self, site: UpsertSite) -> Result<SiteRecord> {
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO site (id, name, description, logo_path, updated_at)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                logo_path = excluded.logo_path,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&site.name)
        .bind(&site.description)
        .bind(&site.logo_path)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get()
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to store site configuration"))
    }
}
