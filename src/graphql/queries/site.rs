use super::prelude::*;

#[derive(Default)]
pub struct SiteQueries;

#[Object]
impl SiteQueries {
    /// The site configuration record, if one has been set up
    async fn site(&self, ctx: &Context<'_>) -> Result<Option<Site>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .site()
            .get()
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(site_record_to_graphql))
    }
}
