use super::prelude::*;

#[derive(Default)]
pub struct TaxonomyQueries;

#[Object]
impl TaxonomyQueries {
    /// List all categories
    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<Category>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .categories()
            .list_all()
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(records.into_iter().map(category_record_to_graphql).collect())
    }

    /// Get a category by slug
    async fn category(&self, ctx: &Context<'_>, slug: String) -> Result<Option<Category>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .categories()
            .get_by_slug(&slug)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(category_record_to_graphql))
    }

    /// List all tags
    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<Tag>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .tags()
            .list_all()
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(records.into_iter().map(tag_record_to_graphql).collect())
    }

    /// Get a tag by slug
    async fn tag(&self, ctx: &Context<'_>, slug: String) -> Result<Option<Tag>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .tags()
            .get_by_slug(&slug)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(tag_record_to_graphql))
    }
}
