//! Site configuration mutations

use super::prelude::*;

#[derive(Default)]
pub struct SiteMutations;

#[Object]
impl SiteMutations {
    /// Create or replace the site configuration
    #[graphql(guard = "StaffGuard")]
    async fn update_site(
        &self,
        ctx: &Context<'_>,
        name: String,
        #[graphql(default)] description: String,
        logo_path: Option<String>,
    ) -> Result<Site> {
        let db = ctx.data_unchecked::<Database>();

        if name.trim().is_empty() {
            return Err(validation_error("Site name must not be empty"));
        }

        let record = db
            .site()
            .upsert(UpsertSite {
                name,
                description,
                logo_path,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        tracing::info!(site = %record.name, "Site configuration updated");

        Ok(site_record_to_graphql(record))
    }
}
