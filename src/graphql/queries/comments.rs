use super::prelude::*;

#[derive(Default)]
pub struct CommentQueries;

#[Object]
impl CommentQueries {
    /// Comments on a post, oldest first. Approved only by default;
    /// unapproved comments are visible to staff on request.
    async fn comments(
        &self,
        ctx: &Context<'_>,
        post_id: String,
        #[graphql(default = true)] approved_only: bool,
    ) -> Result<Vec<Comment>> {
        let db = ctx.data_unchecked::<Database>();

        if !approved_only {
            let auth = ctx.auth_user()?;
            if !auth.is_staff {
                return Err(async_graphql::Error::new("Staff privileges required"));
            }
        }

        let records = db
            .comments()
            .list_by_post(&post_id, approved_only)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(records.into_iter().map(comment_record_to_graphql).collect())
    }
}
