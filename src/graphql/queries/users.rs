use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get the current authenticated user
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let record = db
            .users()
            .get_by_id(&auth.user_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| async_graphql::Error::new("User not found"))?;

        Ok(user_record_to_graphql(record))
    }

    /// Look up a user by username
    async fn user(&self, ctx: &Context<'_>, username: String) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .users()
            .get_by_username(&username)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(record.map(user_record_to_graphql))
    }

    /// List all users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .users()
            .list_all()
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(records.into_iter().map(user_record_to_graphql).collect())
    }
}
