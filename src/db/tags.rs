//! Tags repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::helpers::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateTag {
    pub name: String,
    pub slug: String,
    pub description: String,
}

pub struct TagsRepository {
    pool: SqlitePool,
}

impl TagsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a tag. Fails on a duplicate slug.
    pub async fn create(&self, tag: CreateTag) -> Result<TagRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            "INSERT INTO tags (id, name, slug, description, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(&tag.description)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(TagRecord {
            id,
            name: tag.name,
            slug: tag.slug,
            description: tag.description,
            created_at: now,
        })
    }

    /// Get tag by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<TagRecord>> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, slug, description, created_at FROM tags WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(record_from_row))
    }

    /// Get tag by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<TagRecord>> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, slug, description, created_at FROM tags WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(record_from_row))
    }

    /// List all tags, alphabetically
    pub async fn list_all(&self) -> Result<Vec<TagRecord>> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, slug, description, created_at FROM tags ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    /// Tags attached to a post
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<TagRecord>> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String)>(
            r#"
            SELECT t.id, t.name, t.slug, t.description, t.created_at
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    /// Delete a tag and its post attachments
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn record_from_row(r: (String, String, String, String, String)) -> TagRecord {
    TagRecord {
        id: r.0,
        name: r.1,
        slug: r.2,
        description: r.3,
        created_at: r.4,
    }
}
