//! GraphQL type definitions
//!
//! Read-only projections over the persisted entities. The `User`
//! projection never carries the password hash. `Post` and `Comment`
//! resolve their relations and like counts on demand from the database.

use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::db::Database;

use super::helpers::{comment_record_to_graphql, tag_record_to_graphql, user_record_to_graphql};

/// Site-wide configuration
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct Site {
    /// Site name
    pub name: String,
    /// Short description shown in headers and feeds
    pub description: String,
    /// Stored path of the logo image, if any
    pub logo_path: Option<String>,
    pub updated_at: String,
}

/// Public view of a user account
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored path of the avatar image, if any
    pub avatar_path: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    pub joined_at: String,
    pub last_login_at: Option<String>,
}

/// A post category
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: String,
}

/// A post tag
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: String,
}

/// A blog post
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Rich-text body (stored HTML)
    pub content: String,
    /// Stored path of the featured image, if any
    pub featured_image_path: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    /// Author ID; None once the author account is deleted
    pub user_id: Option<String>,
    /// Category ID; None once the category is deleted
    pub category_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Post {
    /// Number of distinct users who liked this post
    async fn number_of_likes(&self, ctx: &Context<'_>) -> Result<i64> {
        let db = ctx.data_unchecked::<Database>();
        db.posts()
            .count_likes(&self.id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    /// The author, if the account still exists
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = &self.user_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .users()
            .get_by_id(user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(user_record_to_graphql))
    }

    /// The category, if still assigned
    async fn category(&self, ctx: &Context<'_>) -> Result<Option<Category>> {
        let Some(category_id) = &self.category_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .categories()
            .get_by_id(category_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(|r| Category {
            id: r.id,
            name: r.name,
            slug: r.slug,
            description: r.description,
            created_at: r.created_at,
        }))
    }

    /// Tags attached to this post
    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<Tag>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .tags()
            .list_for_post(&self.id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(records.into_iter().map(tag_record_to_graphql).collect())
    }

    /// Comments on this post (approved only unless asked otherwise)
    async fn comments(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = true)] approved_only: bool,
    ) -> Result<Vec<Comment>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .comments()
            .list_by_post(&self.id, approved_only)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(records.into_iter().map(comment_record_to_graphql).collect())
    }
}

/// A comment on a post
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Comment {
    pub id: String,
    pub content: String,
    /// Comments await moderation before appearing publicly
    pub is_approved: bool,
    /// Author ID; None once the author account is deleted
    pub user_id: Option<String>,
    /// Post ID; None once the post is deleted
    pub post_id: Option<String>,
    pub created_at: String,
}

#[ComplexObject]
impl Comment {
    /// Number of distinct users who liked this comment
    async fn number_of_likes(&self, ctx: &Context<'_>) -> Result<i64> {
        let db = ctx.data_unchecked::<Database>();
        db.comments()
            .count_likes(&self.id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    /// The author, if the account still exists
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = &self.user_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .users()
            .get_by_id(user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(user_record_to_graphql))
    }
}

// ============================================================================
// Auth payloads
// ============================================================================

/// Decoded token claims exposed to clients
#[derive(Debug, Clone, SimpleObject, Serialize, Deserialize)]
pub struct TokenPayload {
    pub username: String,
    /// Expiration timestamp (unix seconds)
    pub exp: i64,
    /// Original issue timestamp, stable across refreshes (unix seconds)
    pub orig_iat: i64,
}

/// A signed token plus its decoded payload
#[derive(Debug, Clone, SimpleObject)]
pub struct TokenResult {
    pub token: String,
    pub payload: TokenPayload,
}

/// Result of token verification
#[derive(Debug, Clone, SimpleObject)]
pub struct VerifyResult {
    pub payload: TokenPayload,
}

// ============================================================================
// Input types
// ============================================================================

/// Input for creating a post
#[derive(Debug, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    /// Derived from the title when omitted
    pub slug: Option<String>,
    pub content: String,
    pub featured_image_path: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub category_id: Option<String>,
    pub tag_ids: Option<Vec<String>>,
}

/// Input for updating a post; absent fields are left untouched
#[derive(Debug, InputObject)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub featured_image_path: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub category_id: Option<String>,
    pub tag_ids: Option<Vec<String>>,
}
