//! Comments repository
//!
//! Comments are born unapproved; a moderator flips `is_approved` before
//! they show up in public listings. Author and post references are
//! SET NULL, likes cascade with the comment.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::helpers::{int_to_bool, now_iso8601};

type CommentRow = (
    String,         // id
    String,         // content
    i32,            // is_approved
    Option<String>, // user_id
    Option<String>, // post_id
    String,         // created_at
);

const COMMENT_COLUMNS: &str = "id, content, is_approved, user_id, post_id, created_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub content: String,
    pub is_approved: bool,
    pub user_id: Option<String>,
    pub post_id: Option<String>,
    pub created_at: String,
}

impl CommentRecord {
    fn from_row(r: CommentRow) -> Self {
        Self {
            id: r.0,
            content: r.1,
            is_approved: int_to_bool(r.2),
            user_id: r.3,
            post_id: r.4,
            created_at: r.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub content: String,
    pub user_id: String,
    pub post_id: String,
}

pub struct CommentsRepository {
    pool: SqlitePool,
}

impl CommentsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a comment. Always starts unapproved.
    pub async fn create(&self, comment: CreateComment) -> Result<CommentRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO comments (id, content, is_approved, user_id, post_id, created_at)
            VALUES (?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&comment.content)
        .bind(&comment.user_id)
        .bind(&comment.post_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create comment"))
    }

    /// Get comment by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<CommentRecord>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRecord::from_row))
    }

    /// List comments on a post, oldest first
    pub async fn list_by_post(&self, post_id: &str, approved_only: bool) -> Result<Vec<CommentRecord>> {
        let sql = if approved_only {
            format!(
                "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? AND is_approved = 1 ORDER BY created_at"
            )
        } else {
            format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? ORDER BY created_at")
        };

        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CommentRecord::from_row).collect())
    }

    /// Mark a comment as approved
    pub async fn approve(&self, id: &str) -> Result<Option<CommentRecord>> {
        sqlx::query("UPDATE comments SET is_approved = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.get_by_id(id).await
    }

    /// Delete a comment and its likes
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Likes
    // ========================================================================

    /// Record a like (idempotent)
    pub async fn add_like(&self, comment_id: &str, user_id: &str) -> Result<()> {
        let now = now_iso8601();
        sqlx::query(
            "INSERT OR IGNORE INTO comment_likes (comment_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(comment_id)
        .bind(user_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a like
    pub async fn remove_like(&self, comment_id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of distinct users who liked the comment
    pub async fn count_likes(&self, comment_id: &str) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?",
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}
