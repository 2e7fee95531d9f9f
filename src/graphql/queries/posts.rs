use super::prelude::*;

use crate::db::posts::PostFilter;

#[derive(Default)]
pub struct PostQueries;

#[Object]
impl PostQueries {
    /// List posts, newest first. `published` defaults to true so the
    /// public feed never leaks drafts; pass false to include them.
    async fn posts(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = true)] published: bool,
        #[graphql(default = false)] featured: bool,
        category_slug: Option<String>,
        tag_slug: Option<String>,
    ) -> Result<Vec<Post>> {
        let db = ctx.data_unchecked::<Database>();

        let category_id = match category_slug {
            Some(slug) => {
                let record = db
                    .categories()
                    .get_by_slug(&slug)
                    .await
                    .map_err(|e| async_graphql::Error::new(e.to_string()))?;
                match record {
                    Some(c) => Some(c.id),
                    // Unknown category matches nothing
                    None => return Ok(vec![]),
                }
            }
            None => None,
        };

        let tag_id = match tag_slug {
            Some(slug) => {
                let record = db
                    .tags()
                    .get_by_slug(&slug)
                    .await
                    .map_err(|e| async_graphql::Error::new(e.to_string()))?;
                match record {
                    Some(t) => Some(t.id),
                    None => return Ok(vec![]),
                }
            }
            None => None,
        };

        let records = db
            .posts()
            .list(PostFilter {
                published_only: published,
                featured_only: featured,
                category_id,
                tag_id,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(records.into_iter().map(post_record_to_graphql).collect())
    }

    /// Get a post by slug
    async fn post(&self, ctx: &Context<'_>, slug: String) -> Result<Option<Post>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .posts()
            .get_by_slug(&slug)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(post_record_to_graphql))
    }

    /// Get a post by ID
    async fn post_by_id(&self, ctx: &Context<'_>, id: String) -> Result<Option<Post>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .posts()
            .get_by_id(&id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(post_record_to_graphql))
    }
}
