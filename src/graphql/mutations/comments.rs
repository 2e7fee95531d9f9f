//! Comment mutations
//!
//! New comments always start unapproved; approval is a staff action.
//! The referenced user and post are looked up before the insert so a bad
//! reference fails with a precise error instead of a constraint
//! violation.

use super::prelude::*;

#[derive(Default)]
pub struct CommentMutations;

#[Object]
impl CommentMutations {
    /// Create a comment on a post. Starts unapproved.
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        content: String,
        user_id: String,
        post_id: String,
    ) -> Result<Comment> {
        let db = ctx.data_unchecked::<Database>();

        if content.trim().is_empty() {
            return Err(validation_error("Comment content must not be empty"));
        }

        if db
            .users()
            .get_by_id(&user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_none()
        {
            return Err(not_found_error("User not found"));
        }

        if db
            .posts()
            .get_by_id(&post_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_none()
        {
            return Err(not_found_error("Post not found"));
        }

        let record = db
            .comments()
            .create(CreateComment {
                content,
                user_id,
                post_id,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        tracing::info!(comment_id = %record.id, "Comment created, awaiting approval");

        Ok(comment_record_to_graphql(record))
    }

    /// Approve a comment for public display
    #[graphql(guard = "StaffGuard")]
    async fn approve_comment(&self, ctx: &Context<'_>, id: String) -> Result<Comment> {
        let db = ctx.data_unchecked::<Database>();

        let record = db
            .comments()
            .approve(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| not_found_error("Comment not found"))?;

        tracing::info!(comment_id = %record.id, "Comment approved");

        Ok(comment_record_to_graphql(record))
    }

    /// Delete a comment
    #[graphql(guard = "StaffGuard")]
    async fn delete_comment(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();

        let deleted = db
            .comments()
            .delete(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        if !deleted {
            return Err(not_found_error("Comment not found"));
        }
        Ok(true)
    }

    /// Like a comment (idempotent), returning the new like count
    #[graphql(guard = "AuthGuard")]
    async fn like_comment(&self, ctx: &Context<'_>, comment_id: String) -> Result<i64> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let comments = db.comments();

        if comments
            .get_by_id(&comment_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_none()
        {
            return Err(not_found_error("Comment not found"));
        }

        comments
            .add_like(&comment_id, &auth.user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        comments
            .count_likes(&comment_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    /// Remove a like from a comment, returning the new like count
    #[graphql(guard = "AuthGuard")]
    async fn unlike_comment(&self, ctx: &Context<'_>, comment_id: String) -> Result<i64> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let comments = db.comments();

        comments
            .remove_like(&comment_id, &auth.user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        comments
            .count_likes(&comment_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}
