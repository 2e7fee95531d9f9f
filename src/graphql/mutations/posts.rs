//! Post mutations

use super::prelude::*;

use crate::services::slugify;

#[derive(Default)]
pub struct PostMutations;

#[Object]
impl PostMutations {
    /// Create a post authored by the current user
    #[graphql(guard = "AuthGuard")]
    async fn create_post(&self, ctx: &Context<'_>, input: CreatePostInput) -> Result<Post> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        if input.title.trim().is_empty() {
            return Err(validation_error("Title must not be empty"));
        }

        let slug = match input.slug {
            Some(s) if !s.trim().is_empty() => s,
            _ => slugify(&input.title),
        };
        if slug.is_empty() {
            return Err(validation_error("Could not derive a slug from the title"));
        }

        let posts = db.posts();

        if posts
            .get_by_slug(&slug)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_some()
        {
            return Err(validation_error("A post with that slug already exists"));
        }

        if let Some(category_id) = &input.category_id {
            if db
                .categories()
                .get_by_id(category_id)
                .await
                .map_err(|e| async_graphql::Error::new(e.to_string()))?
                .is_none()
            {
                return Err(not_found_error("Category not found"));
            }
        }

        // Check referents before the insert so a bad tag never leaves a
        // half-created post behind
        if let Some(tag_ids) = &input.tag_ids {
            for tag_id in tag_ids {
                if db
                    .tags()
                    .get_by_id(tag_id)
                    .await
                    .map_err(|e| async_graphql::Error::new(e.to_string()))?
                    .is_none()
                {
                    return Err(not_found_error("Tag not found"));
                }
            }
        }

        let record = posts
            .create(CreatePost {
                title: input.title,
                slug,
                content: input.content,
                featured_image_path: input.featured_image_path,
                is_published: input.is_published.unwrap_or(false),
                is_featured: input.is_featured.unwrap_or(false),
                user_id: Some(auth.user_id.clone()),
                category_id: input.category_id,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        if let Some(tag_ids) = input.tag_ids {
            posts
                .set_tags(&record.id, &tag_ids)
                .await
                .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        }

        tracing::info!(post_id = %record.id, slug = %record.slug, "Post created");

        Ok(post_record_to_graphql(record))
    }

    /// Update a post. Only the author or staff may edit.
    #[graphql(guard = "AuthGuard")]
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdatePostInput,
    ) -> Result<Post> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let posts = db.posts();

        let existing = posts
            .get_by_id(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| not_found_error("Post not found"))?;

        let is_author = existing.user_id.as_deref() == Some(auth.user_id.as_str());
        if !is_author && !auth.is_staff {
            return Err(async_graphql::Error::new("Not the author of this post")
                .extend_with(|_, e| e.set("code", "FORBIDDEN")));
        }

        if let Some(slug) = &input.slug {
            if let Some(other) = posts
                .get_by_slug(slug)
                .await
                .map_err(|e| async_graphql::Error::new(e.to_string()))?
            {
                if other.id != id {
                    return Err(validation_error("A post with that slug already exists"));
                }
            }
        }

        let record = posts
            .update(
                &id,
                UpdatePost {
                    title: input.title,
                    slug: input.slug,
                    content: input.content,
                    featured_image_path: input.featured_image_path.map(Some),
                    is_published: input.is_published,
                    is_featured: input.is_featured,
                    category_id: input.category_id.map(Some),
                },
            )
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| not_found_error("Post not found"))?;

        if let Some(tag_ids) = input.tag_ids {
            posts
                .set_tags(&id, &tag_ids)
                .await
                .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        }

        Ok(post_record_to_graphql(record))
    }

    /// Delete a post. Only the author or staff may delete.
    #[graphql(guard = "AuthGuard")]
    async fn delete_post(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let posts = db.posts();

        let existing = posts
            .get_by_id(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| not_found_error("Post not found"))?;

        let is_author = existing.user_id.as_deref() == Some(auth.user_id.as_str());
        if !is_author && !auth.is_staff {
            return Err(async_graphql::Error::new("Not the author of this post")
                .extend_with(|_, e| e.set("code", "FORBIDDEN")));
        }

        posts
            .delete(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        tracing::info!(post_id = %id, "Post deleted");

        Ok(true)
    }

    /// Like a post (idempotent), returning the new like count
    #[graphql(guard = "AuthGuard")]
    async fn like_post(&self, ctx: &Context<'_>, post_id: String) -> Result<i64> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let posts = db.posts();

        if posts
            .get_by_id(&post_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_none()
        {
            return Err(not_found_error("Post not found"));
        }

        posts
            .add_like(&post_id, &auth.user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        posts
            .count_likes(&post_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    /// Remove a like from a post, returning the new like count
    #[graphql(guard = "AuthGuard")]
    async fn unlike_post(&self, ctx: &Context<'_>, post_id: String) -> Result<i64> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let posts = db.posts();

        posts
            .remove_like(&post_id, &auth.user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        posts
            .count_likes(&post_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}
