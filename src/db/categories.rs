//! Categories repository
//!
//! Posts reference a category with ON DELETE SET NULL: removing a
//! category leaves its posts uncategorized rather than deleting them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::helpers::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
}

pub struct CategoriesRepository {
    pool: SqlitePool,
}

impl CategoriesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a category. Fails on a duplicate slug.
    pub async fn create(&self, category: CreateCategory) -> Result<CategoryRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            "INSERT INTO categories (id, name, slug, description, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(CategoryRecord {
            id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: now,
        })
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<CategoryRecord>> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, slug, description, created_at FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(record_from_row))
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, slug, description, created_at FROM categories WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(record_from_row))
    }

    /// List all categories, alphabetically
    pub async fn list_all(&self) -> Result<Vec<CategoryRecord>> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, slug, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    /// Delete a category, detaching its posts
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn record_from_row(r: (String, String, String, String, String)) -> CategoryRecord {
    CategoryRecord {
        id: r.0,
        name: r.1,
        slug: r.2,
        description: r.3,
        created_at: r.4,
    }
}
