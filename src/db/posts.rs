//! Posts repository
//!
//! Authorship and categorization are SET NULL references; tags and likes
//! live in join tables that cascade with the post. Like counts are always
//! derived with COUNT, never stored.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::helpers::{bool_to_int, int_to_bool, now_iso8601};

type PostRow = (
    String,         // id
    String,         // title
    String,         // slug
    String,         // content
    Option<String>, // featured_image_path
    i32,            // is_published
    i32,            // is_featured
    Option<String>, // user_id
    Option<String>, // category_id
    String,         // created_at
    String,         // updated_at
);

const POST_COLUMNS: &str = "id, title, slug, content, featured_image_path, is_published, \
     is_featured, user_id, category_id, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub featured_image_path: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostRecord {
    fn from_row(r: PostRow) -> Self {
        Self {
            id: r.0,
            title: r.1,
            slug: r.2,
            content: r.3,
            featured_image_path: r.4,
            is_published: int_to_bool(r.5),
            is_featured: int_to_bool(r.6),
            user_id: r.7,
            category_id: r.8,
            created_at: r.9,
            updated_at: r.10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub featured_image_path: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub user_id: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub featured_image_path: Option<Option<String>>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub category_id: Option<Option<String>>,
}

/// Filters for listing posts; all optional, combined with AND
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub published_only: bool,
    pub featured_only: bool,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
}

pub struct PostsRepository {
    pool: SqlitePool,
}

impl PostsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a post. Fails on a duplicate slug.
    pub async fn create(&self, post: CreatePost) -> Result<PostRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO posts (id, title, slug, content, featured_image_path,
                               is_published, is_featured, user_id, category_id,
                               created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.featured_image_path)
        .bind(bool_to_int(post.is_published))
        .bind(bool_to_int(post.is_featured))
        .bind(&post.user_id)
        .bind(&post.category_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create post"))
    }

    /// Get post by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRecord::from_row))
    }

    /// Get post by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRecord::from_row))
    }

    /// List posts matching the filter, newest first
    pub async fn list(&self, filter: PostFilter) -> Result<Vec<PostRecord>> {
        let mut sql = format!("SELECT p.{} FROM posts p", POST_COLUMNS.replace(", ", ", p."));
        let mut conditions: Vec<&str> = Vec::new();

        if filter.tag_id.is_some() {
            sql.push_str(" JOIN post_tags pt ON pt.post_id = p.id");
            conditions.push("pt.tag_id = ?");
        }
        if filter.published_only {
            conditions.push("p.is_published = 1");
        }
        if filter.featured_only {
            conditions.push("p.is_featured = 1");
        }
        if filter.category_id.is_some() {
            conditions.push("p.category_id = ?");
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY p.created_at DESC");

        let mut query = sqlx::query_as::<_, PostRow>(&sql);
        if let Some(tag_id) = &filter.tag_id {
            query = query.bind(tag_id);
        }
        if let Some(category_id) = &filter.category_id {
            query = query.bind(category_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(PostRecord::from_row).collect())
    }

    /// Apply a partial update
    pub async fn update(&self, id: &str, update: UpdatePost) -> Result<Option<PostRecord>> {
        let now = now_iso8601();

        if let Some(title) = update.title {
            sqlx::query("UPDATE posts SET title = ?, updated_at = ? WHERE id = ?")
                .bind(title)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(slug) = update.slug {
            sqlx::query("UPDATE posts SET slug = ?, updated_at = ? WHERE id = ?")
                .bind(slug)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(content) = update.content {
            sqlx::query("UPDATE posts SET content = ?, updated_at = ? WHERE id = ?")
                .bind(content)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(featured_image_path) = update.featured_image_path {
            sqlx::query("UPDATE posts SET featured_image_path = ?, updated_at = ? WHERE id = ?")
                .bind(featured_image_path)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(is_published) = update.is_published {
            sqlx::query("UPDATE posts SET is_published = ?, updated_at = ? WHERE id = ?")
                .bind(bool_to_int(is_published))
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(is_featured) = update.is_featured {
            sqlx::query("UPDATE posts SET is_featured = ?, updated_at = ? WHERE id = ?")
                .bind(bool_to_int(is_featured))
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(category_id) = update.category_id {
            sqlx::query("UPDATE posts SET category_id = ?, updated_at = ? WHERE id = ?")
                .bind(category_id)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        self.get_by_id(id).await
    }

    /// Delete a post. Join rows cascade; comments keep a NULL post ref.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Attach a tag (no-op if already attached)
    pub async fn add_tag(&self, post_id: &str, tag_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Detach a tag
    pub async fn remove_tag(&self, post_id: &str, tag_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_tags WHERE post_id = ? AND tag_id = ?")
            .bind(post_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the post's tag set
    pub async fn set_tags(&self, post_id: &str, tag_ids: &[String]) -> Result<()> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await?;
        for tag_id in tag_ids {
            self.add_tag(post_id, tag_id).await?;
        }
        Ok(())
    }

    // ========================================================================
    // Likes
    // ========================================================================

    /// Record a like (idempotent)
    pub async fn add_like(&self, post_id: &str, user_id: &str) -> Result<()> {
        let now = now_iso8601();
        sqlx::query(
            "INSERT OR IGNORE INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a like
    pub async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of distinct users who liked the post
    pub async fn count_likes(&self, post_id: &str) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM post_likes WHERE post_id = ?",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Whether the given user has liked the post
    pub async fn has_liked(&self, post_id: &str, user_id: &str) -> Result<bool> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM post_likes WHERE post_id = ? AND user_id = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0 > 0)
    }
}
