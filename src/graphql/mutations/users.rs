//! User account mutations

use super::prelude::*;

use crate::services::is_valid_email;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Register a new user account.
    ///
    /// No authentication required. The password is hashed before storage
    /// and never echoed back.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        email: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();
        let auth = ctx.data_unchecked::<AuthService>();

        if username.trim().is_empty() {
            return Err(validation_error("Username must not be empty"));
        }
        if password.is_empty() {
            return Err(validation_error("Password must not be empty"));
        }
        if !is_valid_email(&email) {
            return Err(validation_error("Invalid email address"));
        }

        let users = db.users();

        if users
            .get_by_username(&username)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .is_some()
        {
            return Err(validation_error("A user with that username already exists"));
        }

        let password_hash = auth
            .hash_password(&password)
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        let record = users
            .create(CreateUser {
                username,
                email,
                password_hash,
                first_name,
                last_name,
                is_staff: false,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        tracing::info!(user_id = %record.id, username = %record.username, "User created");

        Ok(user_record_to_graphql(record))
    }

    /// Deactivate a user account instead of deleting it
    #[graphql(guard = "StaffGuard")]
    async fn deactivate_user(&self, ctx: &Context<'_>, id: String) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();

        let record = db
            .users()
            .update(
                &id,
                UpdateUser {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .ok_or_else(|| not_found_error("User not found"))?;

        tracing::info!(user_id = %record.id, "User deactivated");

        Ok(user_record_to_graphql(record))
    }
}
