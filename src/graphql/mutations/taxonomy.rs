//! Category and tag mutations

use super::prelude::*;

use crate::services::slugify;

#[derive(Default)]
pub struct TaxonomyMutations;

#[Object]
impl TaxonomyMutations {
    /// Create a category
    #[graphql(guard = "StaffGuard")]
    async fn create_category(
        &self,
        ctx: &Context<'_>,
        name: String,
        slug: Option<String>,
        #[graphql(default)] description: String,
    ) -> Result<Category> {
        let db = ctx.data_unchecked::<Database>();

        if name.trim().is_empty() {
            return Err(validation_error("Name must not be empty"));
        }

        let slug = match slug {
            Some(s) if !s.trim().is_empty() => s,
            _ => slugify(&name),
        };

        if db
            .categories()
            .get_by_slug(&slug)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_some()
        {
            return Err(validation_error("A category with that slug already exists"));
        }

        let record = db
            .categories()
            .create(CreateCategory {
                name,
                slug,
                description,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(category_record_to_graphql(record))
    }

    /// Delete a category. Its posts are left uncategorized.
    #[graphql(guard = "StaffGuard")]
    async fn delete_category(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();

        let deleted = db
            .categories()
            .delete(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        if !deleted {
            return Err(not_found_error("Category not found"));
        }
        Ok(true)
    }

    /// Create a tag
    #[graphql(guard = "StaffGuard")]
    async fn create_tag(
        &self,
        ctx: &Context<'_>,
        name: String,
        slug: Option<String>,
        #[graphql(default)] description: String,
    ) -> Result<Tag> {
        let db = ctx.data_unchecked::<Database>();

        if name.trim().is_empty() {
            return Err(validation_error("Name must not be empty"));
        }

        let slug = match slug {
            Some(s) if !s.trim().is_empty() => s,
            _ => slugify(&name),
        };

        if db
            .tags()
            .get_by_slug(&slug)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_some()
        {
            return Err(validation_error("A tag with that slug already exists"));
        }

        let record = db
            .tags()
            .create(CreateTag {
                name,
                slug,
                description,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(tag_record_to_graphql(record))
    }

    /// Delete a tag, detaching it from all posts
    #[graphql(guard = "StaffGuard")]
    async fn delete_tag(&self, ctx: &Context<'_>, id: String) -> Result<bool> {
        let db = ctx.data_unchecked::<Database>();

        let deleted = db
            .tags()
            .delete(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        if !deleted {
            return Err(not_found_error("Tag not found"));
        }
        Ok(true)
    }
}
